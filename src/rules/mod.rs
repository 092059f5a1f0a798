//! Move legality and application.
//!
//! `RulesEngine` is the seam between game data and game rules:
//! - Legal moves for a state, as an `ActionMask`
//! - How a move changes the state
//! - Whether the game has a winner
//!
//! `ChineseCheckers` is the concrete two-player ruleset.

pub mod checkers;
pub mod engine;

pub use checkers::ChineseCheckers;
pub use engine::{MoveList, RulesEngine, RulesError};
