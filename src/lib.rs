//! # chinese-checkers
//!
//! A two-player Chinese Checkers rules engine built to be simulated in bulk
//! for self-play and reinforcement-learning rollouts.
//!
//! ## Design Principles
//!
//! 1. **Flat at the edge, typed inside**: host tensors see a fixed
//!    `TOTAL_STATE`-integer record per game. Inside the crate a state is a
//!    `GameState` with named fields, encoded only at the boundary.
//!
//! 2. **One rule path**: the action mask and checked move application
//!    share a single classification routine, so they cannot disagree.
//!
//! 3. **Fail loudly on contract violations**: applying a move that is not
//!    in the mask returns a `RulesError` through the checked API. The
//!    unchecked API is the trusted hot path.
//!
//! 4. **Embarrassingly parallel**: batches are independent games, mapped
//!    with rayon.
//!
//! ## Modules
//!
//! - `board`: hex-grid topology, offset tables, start cells
//! - `core`: players, moves, action masks, game state, flat layout, RNG
//! - `rules`: `RulesEngine` trait and the `ChineseCheckers` ruleset
//! - `batch`: batched initialize / mask / apply over many games
//! - `playout`: uniform random self-play and move-log generation
//! - `replay`: move-log format, replay, validation

pub mod batch;
pub mod board;
pub mod core;
pub mod playout;
pub mod replay;
pub mod rules;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::board::{Cell, Direction, END_TURN, N_MOVES};

pub use crate::core::{
    ActionMask, CellMarker, Chain, GameRng, GameState, LayoutError, Move, MoveOutcome, PlayerId, PlayerMap,
    StateError, TOTAL_STATE,
};

pub use crate::rules::{ChineseCheckers, RulesEngine, RulesError};

pub use crate::batch::{
    apply_move_batch, compute_action_mask_batch, initialize_batch, BatchError, StateBatch,
};

pub use crate::playout::{run_many, Playout, PlayoutConfig, PlayoutEnd, PlayoutSummary};

pub use crate::replay::{validate_log, LogMove, Replay, ValidationReport};
