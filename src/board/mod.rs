//! Static hex-board topology.
//!
//! - `constants`: board dimensions, offset tables, column ranges, start cells
//! - `geometry`: `Cell`, `Direction`, validity and neighbor lookups
//!
//! Nothing in this module holds state.

pub mod constants;
pub mod geometry;

pub use constants::*;
pub use geometry::{
    double_step, is_valid_cell, is_valid_coords, neighbor, neighbors, valid_cells, valid_neighbors, Cell, Direction,
};
