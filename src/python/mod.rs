//! Python bindings over the flat batch entry points.
//!
//! States are `int32` arrays of shape `[n, TOTAL_STATE]`, masks are
//! `[n, N_MOVES]` and moves are `[n]`. Work runs with the GIL released.
//!
//! # Quick Start
//!
//! ```python
//! import numpy as np
//! import chinese_checkers as cc
//!
//! states = cc.initialize_state_batched(64)
//! masks = cc.get_action_mask_batched(states)
//! moves = np.array([np.flatnonzero(m)[0] for m in masks], dtype=np.int32)
//! cc.update_state_batched(states, moves)
//! ```

use numpy::{
    PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray1, PyReadonlyArray2, PyReadwriteArray2,
    PyUntypedArrayMethods,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::batch::{apply_move_batch, compute_action_mask_batch, initialize_batch, BatchError};
use crate::board::{
    Cell, COLS, DOUBLE_STEP_NEIGHBORS, EVEN_ROW_NEIGHBORS, MIN_MAX_COLS, N_DIRECTIONS, N_MOVES,
    N_PIECES_PER_PLAYER, ODD_ROW_NEIGHBORS, PLAYER_1_START, PLAYER_2_START, ROWS,
};
use crate::core::TOTAL_STATE;

fn batch_err(e: BatchError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn check_width(shape: &[usize], width: usize, name: &str) -> PyResult<usize> {
    if shape.len() != 2 || shape[1] != width {
        return Err(PyValueError::new_err(format!(
            "{} must have shape [n, {}], got {:?}",
            name, width, shape
        )));
    }
    Ok(shape[0])
}

fn cell_pairs(cells: &[Cell]) -> Vec<(i8, i8)> {
    cells.iter().map(|c| (c.row, c.col)).collect()
}

/// Create `n_batch` fresh game states.
#[pyfunction]
fn initialize_state_batched(py: Python<'_>, n_batch: usize) -> PyResult<Bound<'_, PyArray2<i32>>> {
    let flat = py.allow_threads(|| initialize_batch(n_batch));
    PyArray1::from_vec_bound(py, flat)
        .reshape([n_batch, TOTAL_STATE])
        .map_err(|e| PyErr::new::<PyValueError, _>(format!("{}", e)))
}

/// Legal-move masks for a batch of states.
#[pyfunction]
fn get_action_mask_batched<'py>(
    py: Python<'py>,
    game_state_batch: PyReadonlyArray2<'py, i32>,
) -> PyResult<Bound<'py, PyArray2<i32>>> {
    let n = check_width(game_state_batch.shape(), TOTAL_STATE, "game_state_batch")?;
    let states = game_state_batch.as_slice()?;
    let masks = py
        .allow_threads(|| compute_action_mask_batch(states))
        .map_err(batch_err)?;
    PyArray1::from_vec_bound(py, masks)
        .reshape([n, N_MOVES])
        .map_err(|e| PyErr::new::<PyValueError, _>(format!("{}", e)))
}

/// Apply one move per state, in place. Returns 0.
///
/// Raises `ValueError` without modifying anything if a move is illegal.
#[pyfunction]
fn update_state_batched<'py>(
    py: Python<'py>,
    mut game_state_batch: PyReadwriteArray2<'py, i32>,
    moves_batch: PyReadonlyArray1<'py, i32>,
) -> PyResult<i64> {
    check_width(game_state_batch.shape(), TOTAL_STATE, "game_state_batch")?;
    let moves = moves_batch.as_slice()?;
    let states = game_state_batch.as_slice_mut()?;
    py.allow_threads(|| apply_move_batch(states, moves))
        .map_err(batch_err)?;
    Ok(0)
}

/// chinese_checkers: batched two-player Chinese Checkers for RL rollouts.
#[pymodule]
fn chinese_checkers(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("ROWS", ROWS)?;
    m.add("COLS", COLS)?;
    m.add("N_PIECES_PER_PLAYER", N_PIECES_PER_PLAYER)?;
    m.add("N_DIRECTIONS", N_DIRECTIONS)?;
    m.add("N_MOVES", N_MOVES)?;
    m.add("TOTAL_STATE", TOTAL_STATE)?;

    m.add("even_row_neighbors", EVEN_ROW_NEIGHBORS.to_vec())?;
    m.add("odd_row_neighbors", ODD_ROW_NEIGHBORS.to_vec())?;
    m.add("double_step_neighbors", DOUBLE_STEP_NEIGHBORS.to_vec())?;
    m.add("min_max_cols", MIN_MAX_COLS.to_vec())?;
    m.add("MIN_MAX_COLS", MIN_MAX_COLS.to_vec())?;
    m.add("player_1_start", cell_pairs(&PLAYER_1_START))?;
    m.add("player_2_start", cell_pairs(&PLAYER_2_START))?;

    m.add_function(wrap_pyfunction!(initialize_state_batched, m)?)?;
    m.add_function(wrap_pyfunction!(get_action_mask_batched, m)?)?;
    m.add_function(wrap_pyfunction!(update_state_batched, m)?)?;
    Ok(())
}
