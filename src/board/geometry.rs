//! Cells, directions, and neighbor lookups.
//!
//! Every function here is pure and total: off-board or out-of-range inputs
//! produce off-board cells or `false`, never a panic.

use serde::{Deserialize, Serialize};

use super::constants::{
    COLS, DOUBLE_STEP_NEIGHBORS, EVEN_ROW_NEIGHBORS, MIN_MAX_COLS, N_DIRECTIONS, ODD_ROW_NEIGHBORS, ROWS,
};

/// A `(row, col)` coordinate on the backing grid.
///
/// Coordinates are signed so that neighbors of edge cells (which may fall
/// outside the grid) are still representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Build a cell from wide integer coordinates.
    ///
    /// Returns `None` when either coordinate does not fit the grid's index
    /// type; such a cell could never be valid anyway.
    #[must_use]
    pub fn from_coords(row: i32, col: i32) -> Option<Self> {
        Some(Self::new(i8::try_from(row).ok()?, i8::try_from(col).ok()?))
    }

    /// Whether the cell lies inside the rectangular grid (valid or not).
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.row >= 0 && (self.row as usize) < ROWS && self.col >= 0 && (self.col as usize) < COLS
    }

    /// Whether the cell is part of the star-shaped board.
    #[must_use]
    pub fn is_valid(self) -> bool {
        is_valid_cell(self)
    }

    /// Row-major index into the grid.
    ///
    /// Only meaningful for in-bounds cells.
    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * COLS + self.col as usize
    }

    /// Inverse of [`Cell::index`].
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::new((index / COLS) as i8, (index % COLS) as i8)
    }

    /// Whether the cell sits on an even row.
    #[must_use]
    pub const fn is_even_row(self) -> bool {
        self.row % 2 == 0
    }

    fn offset(self, (d_row, d_col): (i8, i8)) -> Self {
        Self::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the six hex directions, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    NorthEast = 0,
    East = 1,
    SouthEast = 2,
    SouthWest = 3,
    West = 4,
    NorthWest = 5,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; N_DIRECTIONS] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Direction index in `0..6`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, or `None` if out of range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < N_DIRECTIONS {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// The direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self as usize + 3) % N_DIRECTIONS]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        f.write_str(name)
    }
}

/// Whether `cell` is inside the grid and within its row's column range.
#[must_use]
pub fn is_valid_cell(cell: Cell) -> bool {
    if !cell.in_bounds() {
        return false;
    }
    let (min_col, max_col) = MIN_MAX_COLS[cell.row as usize];
    cell.col >= min_col && cell.col <= max_col
}

/// Wide-integer form of [`is_valid_cell`] for raw buffer coordinates.
#[must_use]
pub fn is_valid_coords(row: i32, col: i32) -> bool {
    Cell::from_coords(row, col).is_some_and(is_valid_cell)
}

fn neighbor_offsets(cell: Cell) -> &'static [(i8, i8); N_DIRECTIONS] {
    if cell.is_even_row() {
        &EVEN_ROW_NEIGHBORS
    } else {
        &ODD_ROW_NEIGHBORS
    }
}

/// The adjacent cell in `direction`. May be off-board.
#[must_use]
pub fn neighbor(cell: Cell, direction: Direction) -> Cell {
    cell.offset(neighbor_offsets(cell)[direction.index()])
}

/// All six adjacent cells in direction order, off-board ones included.
#[must_use]
pub fn neighbors(cell: Cell) -> [Cell; N_DIRECTIONS] {
    let offsets = neighbor_offsets(cell);
    std::array::from_fn(|i| cell.offset(offsets[i]))
}

/// On-board adjacent cells with their directions.
pub fn valid_neighbors(cell: Cell) -> impl Iterator<Item = (Direction, Cell)> {
    Direction::ALL
        .into_iter()
        .zip(neighbors(cell))
        .filter(|&(_, n)| is_valid_cell(n))
}

/// Landing cell of a jump from `cell` over its neighbor in `direction`.
/// May be off-board.
#[must_use]
pub fn double_step(cell: Cell, direction: Direction) -> Cell {
    cell.offset(DOUBLE_STEP_NEIGHBORS[direction.index()])
}

/// All valid cells in row-major order.
pub fn valid_cells() -> impl Iterator<Item = Cell> {
    MIN_MAX_COLS
        .iter()
        .enumerate()
        .flat_map(|(row, &(lo, hi))| (lo..=hi).map(move |col| Cell::new(row as i8, col)))
}
