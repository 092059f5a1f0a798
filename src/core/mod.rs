//! Core game types: players, moves, state, flat layout, RNG.
//!
//! These hold data and enforce structural consistency. Legality of moves
//! lives in [`crate::rules`].

pub mod action;
pub mod layout;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionMask, Move, MoveOutcome};
pub use layout::{
    LayoutError, CURRENT_PLAYER_OFFSET, GAME_METADATA, GRID_OFFSET, LAST_DIRECTION_OFFSET,
    LAST_SKIPPED_PIECE_OFFSET, META_OFFSET, P1_PIECES_OFFSET, P2_PIECES_OFFSET, PIECES_LEN, TOTAL_STATE,
    TURN_COUNT_OFFSET, WINNER_OFFSET,
};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{CellMarker, Chain, GameState, StateError};
