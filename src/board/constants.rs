//! Board dimensions and static lookup tables.
//!
//! The board is a 17×13 rectangle holding a six-pointed star. Rows use a
//! horizontally rotated "odd-q" layout: odd rows are shifted half a cell to
//! the right, so neighbor offsets depend on row parity.
//!
//! All tables are compiled in and never mutated.

use super::geometry::Cell;

/// Number of players.
pub const N_PLAYERS: usize = 2;

/// Pieces per player.
pub const N_PIECES_PER_PLAYER: usize = 10;

/// Hex directions per cell.
pub const N_DIRECTIONS: usize = 6;

/// Rows in the backing grid.
pub const ROWS: usize = 17;

/// Columns in the backing grid.
pub const COLS: usize = 13;

/// Cells in the backing grid (valid and invalid).
pub const NUM_CELLS: usize = ROWS * COLS;

/// Number of valid (on-board) cells.
pub const NUM_VALID_CELLS: usize = 121;

/// Size of the move space: one slot per (piece, direction) plus END_TURN.
pub const N_MOVES: usize = N_PIECES_PER_PLAYER * N_DIRECTIONS + 1;

/// Move index of the END_TURN sentinel.
pub const END_TURN: usize = N_MOVES - 1;

/// Last row of player 1's home triangle (player 2's goal).
pub const HOME_ROWS_MAX: i8 = 3;

/// First row of player 2's home triangle (player 1's goal).
pub const GOAL_ROWS_MIN: i8 = 13;

/// Neighbor offsets `(d_row, d_col)` for cells on even rows.
///
/// Plotted around the origin:
///
/// ```text
///     (-1,-1) (-1, 0)
/// ( 0,-1) ( 0, 0) ( 0, 1)
///     ( 1,-1) ( 1, 0)
/// ```
///
/// Order is NE, E, SE, SW, W, NW.
pub const EVEN_ROW_NEIGHBORS: [(i8, i8); N_DIRECTIONS] =
    [(-1, 0), (0, 1), (1, 0), (1, -1), (0, -1), (-1, -1)];

/// Neighbor offsets `(d_row, d_col)` for cells on odd rows.
pub const ODD_ROW_NEIGHBORS: [(i8, i8); N_DIRECTIONS] =
    [(-1, 1), (0, 1), (1, 1), (1, 0), (0, -1), (-1, 0)];

/// Landing offsets of a two-cell jump. Parity-independent: two hops always
/// cross one even and one odd row.
pub const DOUBLE_STEP_NEIGHBORS: [(i8, i8); N_DIRECTIONS] =
    [(-2, 1), (0, 2), (2, 1), (2, -1), (0, -2), (-2, -1)];

/// Inclusive `(min_col, max_col)` range of valid columns for each row.
pub const MIN_MAX_COLS: [(i8, i8); ROWS] = [
    (6, 6),
    (5, 6),
    (5, 7),
    (4, 7),
    (0, 12),
    (0, 11),
    (1, 11),
    (1, 10),
    (2, 10),
    (1, 10),
    (1, 11),
    (0, 11),
    (0, 12),
    (4, 7),
    (5, 7),
    (5, 6),
    (6, 6),
];

/// Starting cells of player 1, indexed by piece.
pub const PLAYER_1_START: [Cell; N_PIECES_PER_PLAYER] = [
    Cell::new(0, 6),
    Cell::new(1, 5),
    Cell::new(1, 6),
    Cell::new(2, 5),
    Cell::new(2, 6),
    Cell::new(2, 7),
    Cell::new(3, 4),
    Cell::new(3, 5),
    Cell::new(3, 6),
    Cell::new(3, 7),
];

/// Starting cells of player 2, indexed by piece. Mirror of player 1.
pub const PLAYER_2_START: [Cell; N_PIECES_PER_PLAYER] = [
    Cell::new(16, 6),
    Cell::new(15, 5),
    Cell::new(15, 6),
    Cell::new(14, 5),
    Cell::new(14, 6),
    Cell::new(14, 7),
    Cell::new(13, 4),
    Cell::new(13, 5),
    Cell::new(13, 6),
    Cell::new(13, 7),
];
