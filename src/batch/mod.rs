//! Batched evaluation over many independent games.
//!
//! Two views of the same work:
//!
//! - [`StateBatch`] owns typed `GameState`s for Rust callers
//! - `initialize_batch`, `compute_action_mask_batch` and
//!   `apply_move_batch` operate on contiguous flat `i32` buffers of
//!   `TOTAL_STATE`-sized records, the layout host tensors use
//!
//! Slots never interact, so every operation is a rayon parallel map and
//! yields exactly what a sequential loop would.

use rayon::prelude::*;

use crate::board::N_MOVES;
use crate::core::{ActionMask, GameState, LayoutError, Move, MoveOutcome, TOTAL_STATE};
use crate::rules::{ChineseCheckers, RulesEngine, RulesError};

/// Failure of a batch operation. Nothing is modified when one is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// State buffer length is not a multiple of the record size.
    BufferLength { len: usize, record: usize },
    /// Output buffer does not match the number of states.
    OutputLength { expected: usize, found: usize },
    /// Number of moves differs from the number of states.
    MoveCount { states: usize, moves: usize },
    /// A record failed to decode.
    Record { slot: usize, error: LayoutError },
    /// A move is not legal in its slot's state.
    IllegalMove { slot: usize, error: RulesError },
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::BufferLength { len, record } => {
                write!(f, "state buffer length {} is not a multiple of {}", len, record)
            }
            BatchError::OutputLength { expected, found } => {
                write!(f, "output buffer has {} values, expected {}", found, expected)
            }
            BatchError::MoveCount { states, moves } => {
                write!(f, "{} moves given for {} states", moves, states)
            }
            BatchError::Record { slot, error } => write!(f, "slot {}: {}", slot, error),
            BatchError::IllegalMove { slot, error } => write!(f, "slot {}: illegal move: {}", slot, error),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Record { error, .. } => Some(error),
            BatchError::IllegalMove { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Owned collection of independent games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateBatch {
    states: Vec<GameState>,
}

impl StateBatch {
    /// `n` games at the opening position.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            states: vec![GameState::new(); n],
        }
    }

    #[must_use]
    pub fn from_states(states: Vec<GameState>) -> Self {
        Self { states }
    }

    /// Decode a flat buffer of records.
    pub fn from_flat(buf: &[i32]) -> Result<Self, BatchError> {
        Ok(Self {
            states: decode_records(buf)?,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn states(&self) -> &[GameState] {
        &self.states
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&GameState> {
        self.states.get(slot)
    }

    /// Restart one slot at the opening position.
    pub fn reset(&mut self, slot: usize) {
        self.states[slot].initialize();
    }

    /// Restart every slot.
    pub fn reset_all(&mut self) {
        self.states.par_iter_mut().for_each(GameState::initialize);
    }

    /// Legality masks for every slot.
    #[must_use]
    pub fn compute_action_masks(&self) -> Vec<ActionMask> {
        self.states
            .par_iter()
            .map(|state| ChineseCheckers.compute_action_mask(state))
            .collect()
    }

    /// Validate every move, then apply them all.
    ///
    /// On error the batch is untouched and the error names the lowest
    /// offending slot.
    pub fn apply_moves(&mut self, moves: &[Move]) -> Result<Vec<MoveOutcome>, BatchError> {
        if moves.len() != self.states.len() {
            return Err(BatchError::MoveCount {
                states: self.states.len(),
                moves: moves.len(),
            });
        }
        first_error(
            self.states
                .par_iter()
                .zip(moves.par_iter())
                .enumerate()
                .map(|(slot, (state, &mv))| {
                    ChineseCheckers
                        .check(state, mv)
                        .map_err(|error| BatchError::IllegalMove { slot, error })
                })
                .collect(),
        )?;
        Ok(self.apply_moves_unchecked(moves))
    }

    /// Apply moves taken from the current masks without validating them.
    ///
    /// # Panics
    ///
    /// Panics if `moves` and the batch differ in length.
    pub fn apply_moves_unchecked(&mut self, moves: &[Move]) -> Vec<MoveOutcome> {
        assert_eq!(moves.len(), self.states.len(), "One move per slot");
        self.states
            .par_iter_mut()
            .zip(moves.par_iter())
            .map(|(state, &mv)| ChineseCheckers.apply_move_unchecked(state, mv))
            .collect()
    }

    /// Encode every slot into one flat buffer.
    #[must_use]
    pub fn to_flat(&self) -> Vec<i32> {
        let mut buf = vec![0; self.states.len() * TOTAL_STATE];
        buf.par_chunks_mut(TOTAL_STATE)
            .zip(self.states.par_iter())
            .for_each(|(chunk, state)| state.write_flat(chunk));
        buf
    }
}

// === Flat entry points ===

/// `n` freshly initialized records.
#[must_use]
pub fn initialize_batch(n: usize) -> Vec<i32> {
    let mut buf = vec![0; n * TOTAL_STATE];
    buf.par_chunks_mut(TOTAL_STATE)
        .for_each(|chunk| GameState::new().write_flat(chunk));
    buf
}

/// Legality masks, `N_MOVES` 0/1 slots per record.
pub fn compute_action_mask_batch(states: &[i32]) -> Result<Vec<i32>, BatchError> {
    let n = record_count(states.len())?;
    let mut masks = vec![0; n * N_MOVES];
    compute_action_mask_batch_into(states, &mut masks)?;
    Ok(masks)
}

/// Like [`compute_action_mask_batch`], writing into a caller-owned buffer.
pub fn compute_action_mask_batch_into(states: &[i32], masks: &mut [i32]) -> Result<(), BatchError> {
    let n = record_count(states.len())?;
    if masks.len() != n * N_MOVES {
        return Err(BatchError::OutputLength {
            expected: n * N_MOVES,
            found: masks.len(),
        });
    }
    let decoded = decode_records(states)?;
    masks
        .par_chunks_mut(N_MOVES)
        .zip(decoded.par_iter())
        .for_each(|(out, state)| ChineseCheckers.compute_action_mask(state).write_slots(out));
    Ok(())
}

/// Apply one move index per record, in place.
///
/// Every record is decoded and every move checked before any record is
/// written, so on error the buffer is untouched.
pub fn apply_move_batch(states: &mut [i32], moves: &[i32]) -> Result<(), BatchError> {
    let n = record_count(states.len())?;
    if moves.len() != n {
        return Err(BatchError::MoveCount { states: n, moves: moves.len() });
    }
    let decoded = decode_records(states)?;
    let checked: Vec<Move> = first_error(
        decoded
            .par_iter()
            .zip(moves.par_iter())
            .enumerate()
            .map(|(slot, (state, &raw))| {
                let mv = Move::from_raw(raw).ok_or(BatchError::IllegalMove {
                    slot,
                    error: RulesError::MoveOutOfRange { index: i64::from(raw) },
                })?;
                ChineseCheckers
                    .check(state, mv)
                    .map(|()| mv)
                    .map_err(|error| BatchError::IllegalMove { slot, error })
            })
            .collect(),
    )?;

    states
        .par_chunks_mut(TOTAL_STATE)
        .zip(decoded.into_par_iter())
        .zip(checked.into_par_iter())
        .for_each(|((chunk, mut state), mv)| {
            ChineseCheckers.apply_move_unchecked(&mut state, mv);
            state.write_flat(chunk);
        });
    Ok(())
}

fn record_count(len: usize) -> Result<usize, BatchError> {
    if len % TOTAL_STATE != 0 {
        return Err(BatchError::BufferLength {
            len,
            record: TOTAL_STATE,
        });
    }
    Ok(len / TOTAL_STATE)
}

fn decode_records(buf: &[i32]) -> Result<Vec<GameState>, BatchError> {
    record_count(buf.len())?;
    first_error(
        buf.par_chunks(TOTAL_STATE)
            .enumerate()
            .map(|(slot, chunk)| GameState::from_flat(chunk).map_err(|error| BatchError::Record { slot, error }))
            .collect(),
    )
}

/// Collapse per-slot results, keeping the error of the lowest slot.
fn first_error<T>(results: Vec<Result<T, BatchError>>) -> Result<Vec<T>, BatchError> {
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Direction, END_TURN};
    use crate::core::{PlayerId, TURN_COUNT_OFFSET};

    #[test]
    fn test_initialize_batch() {
        let buf = initialize_batch(3);
        let one = GameState::new().to_flat();

        assert_eq!(buf.len(), 3 * TOTAL_STATE);
        for chunk in buf.chunks(TOTAL_STATE) {
            assert_eq!(chunk, one.as_slice());
        }
        assert!(initialize_batch(0).is_empty());
    }

    #[test]
    fn test_mask_batch_matches_single() {
        let buf = initialize_batch(2);
        let masks = compute_action_mask_batch(&buf).unwrap();
        let single = ChineseCheckers.compute_action_mask(&GameState::new()).to_slots();

        assert_eq!(masks.len(), 2 * N_MOVES);
        assert_eq!(&masks[..N_MOVES], single.as_slice());
        assert_eq!(&masks[N_MOVES..], single.as_slice());
    }

    #[test]
    fn test_apply_move_batch_independent_slots() {
        let mut buf = initialize_batch(2);
        let step_se = Move::hop(9, Direction::SouthEast).index() as i32;
        let step_sw = Move::hop(9, Direction::SouthWest).index() as i32;

        apply_move_batch(&mut buf, &[step_se, step_sw]).unwrap();

        let batch = StateBatch::from_flat(&buf).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.states()[0].piece(PlayerId::One, 9).col, 8);
        assert_eq!(batch.states()[1].piece(PlayerId::One, 9).col, 7);
        assert_eq!(buf[TURN_COUNT_OFFSET], 1);
    }

    #[test]
    fn test_apply_move_batch_rejects_and_leaves_buffer() {
        let mut buf = initialize_batch(3);
        let before = buf.clone();
        let step = Move::hop(9, Direction::SouthEast).index() as i32;

        let err = apply_move_batch(&mut buf, &[step, END_TURN as i32, 99]).unwrap_err();

        assert_eq!(
            err,
            BatchError::IllegalMove {
                slot: 1,
                error: RulesError::EndTurnWithoutChain
            }
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            compute_action_mask_batch(&[0; 10]),
            Err(BatchError::BufferLength {
                len: 10,
                record: TOTAL_STATE
            })
        );
        let mut buf = initialize_batch(2);
        assert_eq!(
            apply_move_batch(&mut buf, &[0]),
            Err(BatchError::MoveCount { states: 2, moves: 1 })
        );
        let mut small = vec![0; N_MOVES];
        assert!(matches!(
            compute_action_mask_batch_into(&buf, &mut small),
            Err(BatchError::OutputLength { .. })
        ));
    }

    #[test]
    fn test_state_batch_roundtrip_and_reset() {
        let mut batch = StateBatch::new(4);
        let moves = vec![Move::hop(9, Direction::SouthEast); 4];
        let outcomes = batch.apply_moves(&moves).unwrap();
        assert!(outcomes.iter().all(|o| o.ends_turn()));

        let flat = batch.to_flat();
        assert_eq!(StateBatch::from_flat(&flat).unwrap(), batch);

        batch.reset(2);
        assert_eq!(batch.get(2), Some(&GameState::new()));
        assert_ne!(batch.get(1), Some(&GameState::new()));

        batch.reset_all();
        assert_eq!(batch, StateBatch::new(4));
    }
}
