//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! The two sides of the board. Player 1 starts at the top (rows 0-3) and
//! races to the bottom; player 2 does the reverse.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::board::{Cell, GOAL_ROWS_MIN, HOME_ROWS_MAX, N_PLAYERS};

/// One of the two players.
///
/// The discriminant is the value used for grid markers and in the flat
/// state buffer (1 or 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerId {
    One = 1,
    Two = 2,
}

impl PlayerId {
    /// Both players in turn order.
    pub const ALL: [PlayerId; N_PLAYERS] = [PlayerId::One, PlayerId::Two];

    /// Slot index (0 for player 1, 1 for player 2).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Raw player number (1 or 2).
    #[must_use]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Player for a raw number, or `None` for anything but 1 and 2.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// The opponent.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Whether `cell` lies in this player's goal (the opponent's home triangle).
    #[must_use]
    pub const fn in_goal(self, cell: Cell) -> bool {
        match self {
            PlayerId::One => cell.row >= GOAL_ROWS_MIN,
            PlayerId::Two => cell.row <= HOME_ROWS_MAX,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.raw())
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use chinese_checkers::core::{PlayerId, PlayerMap};
///
/// let mut moves: PlayerMap<u32> = PlayerMap::with_value(0);
/// moves[PlayerId::Two] += 3;
///
/// assert_eq!(moves[PlayerId::One], 0);
/// assert_eq!(moves[PlayerId::Two], 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; N_PLAYERS],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::ALL.map(factory),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
