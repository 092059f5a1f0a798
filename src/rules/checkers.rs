//! Two-player Chinese Checkers rules.
//!
//! ## Turn structure
//!
//! A turn is either one plain step to an adjacent empty cell, or a chain
//! of jumps by a single piece. A step ends the turn at once. After a jump
//! the same player continues with that piece only: it may jump again (but
//! not straight back over the piece it just skipped) or play END_TURN.
//!
//! ```
//! use chinese_checkers::board::Direction;
//! use chinese_checkers::core::{GameState, Move, MoveOutcome, PlayerId};
//! use chinese_checkers::rules::{ChineseCheckers, RulesEngine};
//!
//! let rules = ChineseCheckers;
//! let mut state = GameState::new();
//!
//! let outcome = rules.apply_move(&mut state, Move::hop(9, Direction::SouthEast)).unwrap();
//! assert!(matches!(outcome, MoveOutcome::Step { .. }));
//! assert_eq!(state.current_player(), PlayerId::Two);
//! ```

use crate::board::{double_step, is_valid_cell, neighbor, Direction, N_DIRECTIONS, N_PIECES_PER_PLAYER};
use crate::core::{ActionMask, GameState, Move, MoveOutcome};

use super::engine::{RulesEngine, RulesError};

/// The standard rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChineseCheckers;

/// Classify a hop of `piece` in `direction` for the player to move.
///
/// Both the mask and checked application go through here, so they agree
/// on every slot.
fn classify(state: &GameState, piece: usize, direction: Direction) -> Result<MoveOutcome, RulesError> {
    let chain = state.chain();
    if let Some(chain) = chain {
        if chain.piece != piece {
            return Err(RulesError::PieceNotChained {
                piece,
                chained: chain.piece,
            });
        }
    }

    let from = state.piece(state.current_player(), piece);
    let one_step = neighbor(from, direction);
    if !is_valid_cell(one_step) {
        return Err(RulesError::OffBoard { piece, direction });
    }

    if !state.occupied(one_step) {
        if chain.is_some() {
            return Err(RulesError::StepDuringChain { piece, direction });
        }
        return Ok(MoveOutcome::Step { from, to: one_step });
    }

    let two_step = double_step(from, direction);
    if !is_valid_cell(two_step) || state.occupied(two_step) {
        return Err(RulesError::JumpBlocked { piece, direction });
    }
    if chain.is_some_and(|c| c.direction.opposite() == direction) {
        return Err(RulesError::ReversesChain { piece, direction });
    }
    Ok(MoveOutcome::Jump { from, to: two_step })
}

impl RulesEngine for ChineseCheckers {
    fn compute_action_mask(&self, state: &GameState) -> ActionMask {
        let mut mask = ActionMask::EMPTY;
        let pieces = match state.chain() {
            Some(chain) => chain.piece..chain.piece + 1,
            None => 0..N_PIECES_PER_PLAYER,
        };

        for piece in pieces {
            for direction in Direction::ALL {
                if classify(state, piece, direction).is_ok() {
                    mask.set(piece * N_DIRECTIONS + direction.index());
                }
            }
        }

        if state.is_chaining() {
            mask.set(Move::EndTurn.index());
        }
        mask
    }

    fn check(&self, state: &GameState, mv: Move) -> Result<(), RulesError> {
        match mv {
            Move::EndTurn if state.is_chaining() => Ok(()),
            Move::EndTurn => Err(RulesError::EndTurnWithoutChain),
            Move::Hop { piece, direction } if piece >= N_PIECES_PER_PLAYER => Err(RulesError::MoveOutOfRange {
                index: (piece * N_DIRECTIONS + direction.index()) as i64,
            }),
            Move::Hop { piece, direction } => classify(state, piece, direction).map(|_| ()),
        }
    }

    fn apply_move_unchecked(&self, state: &mut GameState, mv: Move) -> MoveOutcome {
        let (piece, direction) = match mv {
            Move::EndTurn => {
                debug_assert!(state.is_chaining(), "END TURN outside a skip chain");
                state.advance_turn();
                return MoveOutcome::EndTurn;
            }
            Move::Hop { piece, direction } => (piece, direction),
        };

        let player = state.current_player();
        let from = state.piece(player, piece);
        let one_step = neighbor(from, direction);

        if !state.occupied(one_step) {
            debug_assert!(is_valid_cell(one_step), "step off the board");
            state.apply_hop(from, one_step, player, piece);
            state.advance_turn();
            return MoveOutcome::Step { from, to: one_step };
        }

        let two_step = double_step(from, direction);
        debug_assert!(
            is_valid_cell(two_step) && !state.occupied(two_step),
            "jump onto a blocked cell"
        );
        state.apply_hop(from, two_step, player, piece);
        state.set_chain(piece, direction);
        MoveOutcome::Jump { from, to: two_step }
    }
}
