//! Move representation and the action mask.
//!
//! Moves are encoded as integers in `0..N_MOVES`:
//! - `piece * 6 + direction` for a hop of `piece` in `direction`
//! - `END_TURN` (60) to stop an active skip chain
//!
//! ```
//! use chinese_checkers::board::Direction;
//! use chinese_checkers::core::Move;
//!
//! let mv = Move::hop(9, Direction::SouthEast);
//! assert_eq!(mv.index(), 56);
//! assert_eq!(Move::from_index(56), Some(mv));
//! assert_eq!(Move::from_index(60), Some(Move::EndTurn));
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Cell, Direction, END_TURN, N_DIRECTIONS, N_MOVES, N_PIECES_PER_PLAYER};

/// A decoded move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Move `piece` one hop in `direction`: a step if the adjacent cell is
    /// empty, otherwise a jump over it.
    Hop { piece: usize, direction: Direction },
    /// Stop an active skip chain and pass the turn.
    EndTurn,
}

impl Move {
    /// Create a hop move.
    #[must_use]
    pub fn hop(piece: usize, direction: Direction) -> Self {
        assert!(piece < N_PIECES_PER_PLAYER, "Piece index must be 0-9");
        Move::Hop { piece, direction }
    }

    /// Decode a move index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index == END_TURN {
            return Some(Move::EndTurn);
        }
        if index >= END_TURN {
            return None;
        }
        Some(Move::Hop {
            piece: index / N_DIRECTIONS,
            direction: Direction::from_index(index % N_DIRECTIONS)?,
        })
    }

    /// Decode a raw index as stored in host-side move arrays.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw).ok().and_then(Self::from_index)
    }

    /// Encode to a move index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Move::Hop { piece, direction } => piece * N_DIRECTIONS + direction.index(),
            Move::EndTurn => END_TURN,
        }
    }
}

/// What applying a move did to the board.
///
/// Returned by move application so that loggers and renderers get the
/// from/to cells without recomputing geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// A plain step to an adjacent cell; the turn passed.
    Step { from: Cell, to: Cell },
    /// A jump over an occupied cell; the same player continues the chain.
    Jump { from: Cell, to: Cell },
    /// The active chain was ended; the turn passed.
    EndTurn,
}

impl MoveOutcome {
    /// Source and destination cells, if a piece moved.
    #[must_use]
    pub fn cells(self) -> Option<(Cell, Cell)> {
        match self {
            MoveOutcome::Step { from, to } | MoveOutcome::Jump { from, to } => Some((from, to)),
            MoveOutcome::EndTurn => None,
        }
    }

    /// Whether the move handed the turn to the opponent.
    #[must_use]
    pub fn ends_turn(self) -> bool {
        !matches!(self, MoveOutcome::Jump { .. })
    }
}

/// Legality mask over all `N_MOVES` move slots, packed into one word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionMask(u64);

impl ActionMask {
    /// Mask with no legal moves.
    pub const EMPTY: ActionMask = ActionMask(0);

    /// Raw bits; bit `i` set means move index `i` is legal.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mark a slot legal.
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < N_MOVES);
        self.0 |= 1 << index;
    }

    /// Whether a slot is legal. Out-of-range indices are never legal.
    #[must_use]
    pub const fn is_set(self, index: usize) -> bool {
        index < N_MOVES && self.0 & (1 << index) != 0
    }

    /// Whether a move is legal.
    #[must_use]
    pub fn contains(self, mv: Move) -> bool {
        self.is_set(mv.index())
    }

    /// Number of legal moves.
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no move is legal.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Legal move indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }

    /// Legal moves in ascending index order.
    pub fn moves(self) -> impl Iterator<Item = Move> {
        self.indices().filter_map(Move::from_index)
    }

    /// The `n`-th legal move index (0-based), if there are that many.
    #[must_use]
    pub fn nth_index(self, n: usize) -> Option<usize> {
        self.indices().nth(n)
    }

    /// Write the mask as 0/1 slots into `out[..N_MOVES]`.
    pub fn write_slots(self, out: &mut [i32]) {
        for (i, slot) in out[..N_MOVES].iter_mut().enumerate() {
            *slot = i32::from(self.is_set(i));
        }
    }

    /// The mask as a vector of 0/1 slots.
    #[must_use]
    pub fn to_slots(self) -> Vec<i32> {
        let mut out = vec![0; N_MOVES];
        self.write_slots(&mut out);
        out
    }
}
