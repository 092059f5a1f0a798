//! Rules engine trait and move-contract errors.
//!
//! A rules engine answers two questions about a state: which of the
//! `N_MOVES` slots are legal, and what happens when one is applied.
//!
//! ## Implementation Notes
//!
//! - `compute_action_mask` and `check` must agree slot for slot
//! - `apply_move_unchecked` trusts its input; use it only with moves taken
//!   from the current mask
//! - Application must be deterministic

use smallvec::SmallVec;

use crate::board::Direction;
use crate::core::{ActionMask, GameState, Move, MoveOutcome, PlayerId};

/// A move that is not legal in the state it was applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RulesError {
    /// Raw index outside `0..N_MOVES`, or a hop naming a piece outside `0..10`.
    MoveOutOfRange { index: i64 },
    /// END_TURN with no skip chain in progress.
    EndTurnWithoutChain,
    /// A different piece than the one mid-chain.
    PieceNotChained { piece: usize, chained: usize },
    /// The adjacent cell is off the board.
    OffBoard { piece: usize, direction: Direction },
    /// A plain step while a chain is active.
    StepDuringChain { piece: usize, direction: Direction },
    /// The landing cell of a jump is off the board or occupied.
    JumpBlocked { piece: usize, direction: Direction },
    /// A jump straight back over the piece just skipped.
    ReversesChain { piece: usize, direction: Direction },
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::MoveOutOfRange { index } => write!(f, "move index {} out of range", index),
            RulesError::EndTurnWithoutChain => write!(f, "END TURN without an active skip chain"),
            RulesError::PieceNotChained { piece, chained } => {
                write!(f, "piece {} cannot move while piece {} is chaining", piece, chained)
            }
            RulesError::OffBoard { piece, direction } => {
                write!(f, "piece {} cannot move {}: off the board", piece, direction)
            }
            RulesError::StepDuringChain { piece, direction } => {
                write!(f, "piece {} cannot step {} during a skip chain", piece, direction)
            }
            RulesError::JumpBlocked { piece, direction } => {
                write!(f, "piece {} cannot jump {}: landing cell blocked", piece, direction)
            }
            RulesError::ReversesChain { piece, direction } => {
                write!(f, "piece {} cannot jump {}: reverses the previous jump", piece, direction)
            }
        }
    }
}

impl std::error::Error for RulesError {}

/// Legal moves of one position. Rarely more than a handful.
pub type MoveList = SmallVec<[Move; 16]>;

/// Rules engine trait.
///
/// Implementors are stateless and shared freely across threads; all game
/// data lives in `GameState`.
pub trait RulesEngine: Sync {
    /// Legality of every move slot for the player to move.
    fn compute_action_mask(&self, state: &GameState) -> ActionMask;

    /// Validate one move without building the full mask.
    fn check(&self, state: &GameState, mv: Move) -> Result<(), RulesError>;

    /// Apply a move taken from the current mask.
    ///
    /// Behavior for an illegal move is unspecified (it may corrupt the
    /// position), though it never breaks memory safety.
    fn apply_move_unchecked(&self, state: &mut GameState, mv: Move) -> MoveOutcome;

    // === Convenience Methods ===

    /// Whether a move is legal.
    fn is_legal(&self, state: &GameState, mv: Move) -> bool {
        self.check(state, mv).is_ok()
    }

    /// Validate, then apply. The state is untouched on error.
    fn apply_move(&self, state: &mut GameState, mv: Move) -> Result<MoveOutcome, RulesError> {
        self.check(state, mv)?;
        Ok(self.apply_move_unchecked(state, mv))
    }

    /// Decode a raw move index as stored in host arrays, validate, apply.
    fn apply_index(&self, state: &mut GameState, raw: i32) -> Result<MoveOutcome, RulesError> {
        let mv = Move::from_raw(raw).ok_or(RulesError::MoveOutOfRange {
            index: i64::from(raw),
        })?;
        self.apply_move(state, mv)
    }

    /// Legal moves in ascending index order.
    fn legal_moves(&self, state: &GameState) -> MoveList {
        self.compute_action_mask(state).moves().collect()
    }

    /// The recorded winner, if any.
    fn winner(&self, state: &GameState) -> Option<PlayerId> {
        state.winner()
    }

    /// Whether a winner has been recorded.
    ///
    /// Play may continue after a win; callers decide whether to stop.
    fn is_terminal(&self, state: &GameState) -> bool {
        self.winner(state).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RulesError::ReversesChain {
            piece: 4,
            direction: Direction::West,
        };
        assert_eq!(err.to_string(), "piece 4 cannot jump W: reverses the previous jump");
        assert_eq!(
            RulesError::MoveOutOfRange { index: 61 }.to_string(),
            "move index 61 out of range"
        );
    }
}
