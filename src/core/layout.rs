//! Flat `i32` buffer layout of a game state.
//!
//! This is the binary contract shared with host-side tensors. One record
//! is `TOTAL_STATE` integers:
//!
//! | Offset | Length | Field |
//! |--------|--------|-------|
//! | 0      | 221    | occupancy grid, row-major (-1 invalid, 0 empty, 1/2 player) |
//! | 221    | 20     | player 1 pieces as (row, col) pairs |
//! | 241    | 20     | player 2 pieces as (row, col) pairs |
//! | 261    | 1      | current_player (1 or 2) |
//! | 262    | 1      | last_skipped_piece (-1 or 0-9) |
//! | 263    | 1      | last_direction (-1 or 0-5) |
//! | 264    | 1      | winner (0 none, 1 or 2) |
//! | 265    | 1      | turn_count |
//!
//! Field order and sizes must not change.

use super::player::{PlayerId, PlayerMap};
use super::state::{CellMarker, Chain, GameState, StateError};
use crate::board::{Cell, Direction, NUM_CELLS, N_PIECES_PER_PLAYER, N_PLAYERS};

/// Integers per player piece list.
pub const PIECES_LEN: usize = N_PIECES_PER_PLAYER * 2;

/// Metadata integers after the piece lists.
pub const GAME_METADATA: usize = 5;

/// Integers per state record.
pub const TOTAL_STATE: usize = NUM_CELLS + N_PLAYERS * PIECES_LEN + GAME_METADATA;

pub const GRID_OFFSET: usize = 0;
pub const P1_PIECES_OFFSET: usize = GRID_OFFSET + NUM_CELLS;
pub const P2_PIECES_OFFSET: usize = P1_PIECES_OFFSET + PIECES_LEN;
pub const META_OFFSET: usize = P2_PIECES_OFFSET + PIECES_LEN;
pub const CURRENT_PLAYER_OFFSET: usize = META_OFFSET;
pub const LAST_SKIPPED_PIECE_OFFSET: usize = META_OFFSET + 1;
pub const LAST_DIRECTION_OFFSET: usize = META_OFFSET + 2;
pub const WINNER_OFFSET: usize = META_OFFSET + 3;
pub const TURN_COUNT_OFFSET: usize = META_OFFSET + 4;

/// A buffer that does not decode to a well-formed state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// Buffer length is not `TOTAL_STATE`.
    WrongLength { expected: usize, found: usize },
    /// Grid slot holds something other than -1, 0, 1, 2.
    BadMarker { index: usize, value: i32 },
    /// Piece coordinate pair does not fit the grid.
    BadCoordinate { offset: usize, row: i32, col: i32 },
    /// Metadata field out of range.
    BadField { field: &'static str, value: i32 },
    /// Fields decode but describe an inconsistent position.
    State(StateError),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::WrongLength { expected, found } => {
                write!(f, "state buffer has {} values, expected {}", found, expected)
            }
            LayoutError::BadMarker { index, value } => {
                write!(f, "grid slot {} holds invalid marker {}", index, value)
            }
            LayoutError::BadCoordinate { offset, row, col } => {
                write!(f, "piece at offset {} has invalid coordinates ({}, {})", offset, row, col)
            }
            LayoutError::BadField { field, value } => write!(f, "{} has invalid value {}", field, value),
            LayoutError::State(e) => write!(f, "inconsistent state: {}", e),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::State(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StateError> for LayoutError {
    fn from(e: StateError) -> Self {
        LayoutError::State(e)
    }
}

impl GameState {
    /// Encode into `out`, which must be exactly `TOTAL_STATE` long.
    pub fn write_flat(&self, out: &mut [i32]) {
        assert_eq!(out.len(), TOTAL_STATE, "State buffer must hold TOTAL_STATE values");

        for (slot, marker) in out[GRID_OFFSET..P1_PIECES_OFFSET].iter_mut().zip(self.grid.iter()) {
            *slot = marker.raw();
        }
        for (player, offset) in [(PlayerId::One, P1_PIECES_OFFSET), (PlayerId::Two, P2_PIECES_OFFSET)] {
            let pairs = out[offset..offset + PIECES_LEN].chunks_exact_mut(2);
            for (pair, cell) in pairs.zip(self.pieces[player].iter()) {
                pair[0] = i32::from(cell.row);
                pair[1] = i32::from(cell.col);
            }
        }

        out[CURRENT_PLAYER_OFFSET] = self.current_player.raw();
        let (piece, direction) = match self.chain {
            Some(chain) => (chain.piece as i32, chain.direction.index() as i32),
            None => (-1, -1),
        };
        out[LAST_SKIPPED_PIECE_OFFSET] = piece;
        out[LAST_DIRECTION_OFFSET] = direction;
        out[WINNER_OFFSET] = self.winner.map_or(0, PlayerId::raw);
        out[TURN_COUNT_OFFSET] = i32::try_from(self.turn_count).unwrap_or(i32::MAX);
    }

    /// Encode into a new buffer.
    #[must_use]
    pub fn to_flat(&self) -> Vec<i32> {
        let mut out = vec![0; TOTAL_STATE];
        self.write_flat(&mut out);
        out
    }

    /// Decode and validate a record.
    pub fn from_flat(buf: &[i32]) -> Result<Self, LayoutError> {
        if buf.len() != TOTAL_STATE {
            return Err(LayoutError::WrongLength {
                expected: TOTAL_STATE,
                found: buf.len(),
            });
        }

        let mut grid = [CellMarker::Invalid; NUM_CELLS];
        for (index, (slot, &value)) in grid.iter_mut().zip(&buf[..NUM_CELLS]).enumerate() {
            *slot = CellMarker::from_raw(value).ok_or(LayoutError::BadMarker { index, value })?;
        }

        let player_1 = read_pieces(buf, P1_PIECES_OFFSET)?;
        let player_2 = read_pieces(buf, P2_PIECES_OFFSET)?;

        let raw_player = buf[CURRENT_PLAYER_OFFSET];
        let current_player = PlayerId::from_raw(raw_player).ok_or(LayoutError::BadField {
            field: "current_player",
            value: raw_player,
        })?;

        let chain = match (buf[LAST_SKIPPED_PIECE_OFFSET], buf[LAST_DIRECTION_OFFSET]) {
            (-1, -1) => None,
            (piece, direction) => {
                let piece = usize::try_from(piece)
                    .ok()
                    .filter(|&p| p < N_PIECES_PER_PLAYER)
                    .ok_or(LayoutError::BadField {
                        field: "last_skipped_piece",
                        value: piece,
                    })?;
                let direction = usize::try_from(direction)
                    .ok()
                    .and_then(Direction::from_index)
                    .ok_or(LayoutError::BadField {
                        field: "last_direction",
                        value: direction,
                    })?;
                Some(Chain { piece, direction })
            }
        };

        let winner = match buf[WINNER_OFFSET] {
            0 => None,
            raw => Some(PlayerId::from_raw(raw).ok_or(LayoutError::BadField {
                field: "winner",
                value: raw,
            })?),
        };

        let raw_turns = buf[TURN_COUNT_OFFSET];
        let turn_count = u32::try_from(raw_turns).map_err(|_| LayoutError::BadField {
            field: "turn_count",
            value: raw_turns,
        })?;

        let state = GameState {
            grid,
            pieces: PlayerMap::new(|p| match p {
                PlayerId::One => player_1,
                PlayerId::Two => player_2,
            }),
            current_player,
            chain,
            winner,
            turn_count,
        };
        state.check_invariants()?;
        Ok(state)
    }
}

fn read_pieces(buf: &[i32], offset: usize) -> Result<[Cell; N_PIECES_PER_PLAYER], LayoutError> {
    let mut cells = [Cell::new(0, 0); N_PIECES_PER_PLAYER];
    for (i, cell) in cells.iter_mut().enumerate() {
        let at = offset + 2 * i;
        let (row, col) = (buf[at], buf[at + 1]);
        *cell = Cell::from_coords(row, col).ok_or(LayoutError::BadCoordinate { offset: at, row, col })?;
    }
    Ok(cells)
}

impl From<GameState> for Vec<i32> {
    fn from(state: GameState) -> Self {
        state.to_flat()
    }
}

impl TryFrom<Vec<i32>> for GameState {
    type Error = LayoutError;

    fn try_from(buf: Vec<i32>) -> Result<Self, Self::Error> {
        GameState::from_flat(&buf)
    }
}
