//! Game state: occupancy grid, piece lists, and turn metadata.
//!
//! ## Two views of one fact
//!
//! The grid and the per-player piece lists both record where every piece
//! is. They are only ever updated together (`apply_hop`), and
//! `check_invariants` verifies that they agree.
//!
//! ## Lifecycle
//!
//! A state starts at the canonical opening position (`GameState::new` or
//! `initialize` to reuse storage) and is then mutated only through the
//! rules engine. Its serialized form is the flat `i32` layout in
//! [`crate::core::layout`].

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};
use crate::board::{
    is_valid_cell, valid_cells, Cell, Direction, COLS, GOAL_ROWS_MIN, HOME_ROWS_MAX, NUM_CELLS,
    N_PIECES_PER_PLAYER, PLAYER_1_START, PLAYER_2_START, ROWS,
};

/// Content of one grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum CellMarker {
    /// Hole in the rectangular grid; never occupied or traversed.
    Invalid = -1,
    Empty = 0,
    Player1 = 1,
    Player2 = 2,
}

impl CellMarker {
    /// Marker for a player's pieces.
    #[must_use]
    pub const fn for_player(player: PlayerId) -> Self {
        match player {
            PlayerId::One => CellMarker::Player1,
            PlayerId::Two => CellMarker::Player2,
        }
    }

    /// Raw buffer value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Marker for a raw buffer value.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(CellMarker::Invalid),
            0 => Some(CellMarker::Empty),
            1 => Some(CellMarker::Player1),
            2 => Some(CellMarker::Player2),
            _ => None,
        }
    }

    /// The player whose piece this is, if any.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            CellMarker::Player1 => Some(PlayerId::One),
            CellMarker::Player2 => Some(PlayerId::Two),
            CellMarker::Invalid | CellMarker::Empty => None,
        }
    }
}

/// An active skip chain: the piece that jumped and the direction of its
/// last jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    pub piece: usize,
    pub direction: Direction,
}

/// Inconsistency found by [`GameState::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// A piece sits on an invalid cell.
    PieceOffBoard { player: PlayerId, piece: usize, cell: Cell },
    /// Two pieces share a cell.
    PieceOverlap { cell: Cell },
    /// The grid disagrees with the piece lists.
    GridMismatch { cell: Cell, expected: CellMarker, found: CellMarker },
    /// The chained piece index is outside `0..10`.
    ChainPieceOutOfRange { piece: usize },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::PieceOffBoard { player, piece, cell } => {
                write!(f, "{} piece {} is off the board at {}", player, piece, cell)
            }
            StateError::PieceOverlap { cell } => write!(f, "two pieces share cell {}", cell),
            StateError::GridMismatch { cell, expected, found } => {
                write!(f, "grid cell {} holds {:?}, piece lists say {:?}", cell, found, expected)
            }
            StateError::ChainPieceOutOfRange { piece } => {
                write!(f, "chained piece index {} out of range", piece)
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<i32>", try_from = "Vec<i32>")]
pub struct GameState {
    pub(crate) grid: [CellMarker; NUM_CELLS],
    pub(crate) pieces: PlayerMap<[Cell; N_PIECES_PER_PLAYER]>,
    pub(crate) current_player: PlayerId,
    pub(crate) chain: Option<Chain>,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) turn_count: u32,
}

impl GameState {
    /// A fresh game at the opening position.
    #[must_use]
    pub fn new() -> Self {
        let mut state = Self {
            grid: [CellMarker::Invalid; NUM_CELLS],
            pieces: PlayerMap::new(start_cells),
            current_player: PlayerId::One,
            chain: None,
            winner: None,
            turn_count: 0,
        };
        state.initialize();
        state
    }

    /// Reset to the opening position in place.
    ///
    /// Player 1 fills rows 0-3, player 2 fills rows 13-16, player 1 moves
    /// first, no chain is active, nobody has won, and the turn count is 0.
    pub fn initialize(&mut self) {
        for (index, slot) in self.grid.iter_mut().enumerate() {
            let cell = Cell::from_index(index);
            *slot = if !is_valid_cell(cell) {
                CellMarker::Invalid
            } else if cell.row <= HOME_ROWS_MAX {
                CellMarker::Player1
            } else if cell.row >= GOAL_ROWS_MIN {
                CellMarker::Player2
            } else {
                CellMarker::Empty
            };
        }
        self.pieces = PlayerMap::new(start_cells);
        self.current_player = PlayerId::One;
        self.chain = None;
        self.winner = None;
        self.turn_count = 0;
    }

    /// Build a mid-game position from explicit piece placements.
    ///
    /// No chain is active, nobody has won, and the turn count is 0. The
    /// placements are checked the same way decoded buffers are.
    pub fn from_positions(
        player_1: [Cell; N_PIECES_PER_PLAYER],
        player_2: [Cell; N_PIECES_PER_PLAYER],
        to_move: PlayerId,
    ) -> Result<Self, StateError> {
        let pieces = PlayerMap::new(|p| match p {
            PlayerId::One => player_1,
            PlayerId::Two => player_2,
        });
        let grid = grid_from_pieces(&pieces)?;
        Ok(Self {
            grid,
            pieces,
            current_player: to_move,
            chain: None,
            winner: None,
            turn_count: 0,
        })
    }

    // === Queries ===

    /// The occupancy grid in row-major order.
    #[must_use]
    pub fn grid(&self) -> &[CellMarker; NUM_CELLS] {
        &self.grid
    }

    /// Marker at a cell. Off-grid cells read as `Invalid`.
    #[must_use]
    pub fn marker(&self, cell: Cell) -> CellMarker {
        if cell.in_bounds() {
            self.grid[cell.index()]
        } else {
            CellMarker::Invalid
        }
    }

    /// Whether a cell holds either player's piece.
    #[must_use]
    pub fn occupied(&self, cell: Cell) -> bool {
        matches!(self.marker(cell), CellMarker::Player1 | CellMarker::Player2)
    }

    /// Cell of one piece.
    #[must_use]
    pub fn piece(&self, player: PlayerId, piece: usize) -> Cell {
        self.pieces[player][piece]
    }

    /// All of a player's piece cells, indexed by piece.
    #[must_use]
    pub fn pieces(&self, player: PlayerId) -> &[Cell; N_PIECES_PER_PLAYER] {
        &self.pieces[player]
    }

    /// The player to move.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// The active skip chain, if any.
    #[must_use]
    pub fn chain(&self) -> Option<Chain> {
        self.chain
    }

    /// Whether a skip chain is in progress.
    #[must_use]
    pub fn is_chaining(&self) -> bool {
        self.chain.is_some()
    }

    /// The winner, once decided.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Completed turns (not hops).
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    // === Mutation ===

    /// Move one piece from `from` to `to`, updating grid and piece list
    /// together.
    ///
    /// Performs no legality checks and leaves turn metadata alone.
    pub fn apply_hop(&mut self, from: Cell, to: Cell, player: PlayerId, piece: usize) {
        debug_assert_eq!(self.pieces[player][piece], from);
        self.grid[from.index()] = CellMarker::Empty;
        self.grid[to.index()] = CellMarker::for_player(player);
        self.pieces[player][piece] = to;
    }

    /// Record that `piece` just jumped in `direction`.
    pub(crate) fn set_chain(&mut self, piece: usize, direction: Direction) {
        self.chain = Some(Chain { piece, direction });
    }

    /// Finish the current turn: clear the chain, hand the move to the
    /// opponent, count the turn, and check for a winner.
    pub fn advance_turn(&mut self) {
        self.chain = None;
        self.current_player = self.current_player.other();
        self.turn_count += 1;
        self.check_winner();
    }

    /// Record a winner if one has all pieces in their goal.
    ///
    /// Player 1 is checked first. A recorded winner is never replaced.
    pub fn check_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        self.winner = PlayerId::ALL
            .into_iter()
            .find(|&p| self.pieces[p].iter().all(|&cell| p.in_goal(cell)));
    }

    // === Validation ===

    /// Verify that the grid and piece lists describe the same position.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        if let Some(chain) = self.chain {
            if chain.piece >= N_PIECES_PER_PLAYER {
                return Err(StateError::ChainPieceOutOfRange { piece: chain.piece });
            }
        }
        let expected = grid_from_pieces(&self.pieces)?;
        for (index, (&want, &have)) in expected.iter().zip(self.grid.iter()).enumerate() {
            if want != have {
                return Err(StateError::GridMismatch {
                    cell: Cell::from_index(index),
                    expected: want,
                    found: have,
                });
            }
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn start_cells(player: PlayerId) -> [Cell; N_PIECES_PER_PLAYER] {
    match player {
        PlayerId::One => PLAYER_1_START,
        PlayerId::Two => PLAYER_2_START,
    }
}

/// Derive the grid implied by a pair of piece lists.
fn grid_from_pieces(
    pieces: &PlayerMap<[Cell; N_PIECES_PER_PLAYER]>,
) -> Result<[CellMarker; NUM_CELLS], StateError> {
    let mut grid = [CellMarker::Invalid; NUM_CELLS];
    for cell in valid_cells() {
        grid[cell.index()] = CellMarker::Empty;
    }
    for (player, cells) in pieces.iter() {
        for (piece, &cell) in cells.iter().enumerate() {
            if !is_valid_cell(cell) {
                return Err(StateError::PieceOffBoard { player, piece, cell });
            }
            let slot = &mut grid[cell.index()];
            if *slot != CellMarker::Empty {
                return Err(StateError::PieceOverlap { cell });
            }
            *slot = CellMarker::for_player(player);
        }
    }
    Ok(grid)
}

/// Text rendering: one line per row, odd rows shifted right by one column,
/// `.` for empty cells and `1`/`2` for pieces.
impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..ROWS {
            let mut line = String::with_capacity(2 * COLS + 1);
            if row % 2 == 1 {
                line.push(' ');
            }
            for col in 0..COLS {
                let ch = match self.grid[row * COLS + col] {
                    CellMarker::Invalid => ' ',
                    CellMarker::Empty => '.',
                    CellMarker::Player1 => '1',
                    CellMarker::Player2 => '2',
                };
                line.push(ch);
                line.push(' ');
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{N_PIECES_PER_PLAYER, NUM_VALID_CELLS};

    fn count(state: &GameState, marker: CellMarker) -> usize {
        state.grid().iter().filter(|&&m| m == marker).count()
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new();

        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.chain(), None);
        assert_eq!(state.winner(), None);
        assert_eq!(state.turn_count(), 0);
        assert_eq!(count(&state, CellMarker::Player1), N_PIECES_PER_PLAYER);
        assert_eq!(count(&state, CellMarker::Player2), N_PIECES_PER_PLAYER);
        assert_eq!(count(&state, CellMarker::Invalid), NUM_CELLS - NUM_VALID_CELLS);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_initial_pieces_match_start_tables() {
        let state = GameState::new();
        assert_eq!(state.pieces(PlayerId::One), &PLAYER_1_START);
        assert_eq!(state.pieces(PlayerId::Two), &PLAYER_2_START);
        for cell in PLAYER_1_START {
            assert!(cell.row <= 3);
            assert_eq!(state.marker(cell), CellMarker::Player1);
        }
        for cell in PLAYER_2_START {
            assert!(cell.row >= 13);
            assert_eq!(state.marker(cell), CellMarker::Player2);
        }
    }

    #[test]
    fn test_marker_off_grid() {
        let state = GameState::new();
        assert_eq!(state.marker(Cell::new(-1, 6)), CellMarker::Invalid);
        assert_eq!(state.marker(Cell::new(0, 0)), CellMarker::Invalid);
        assert!(!state.occupied(Cell::new(-1, 6)));
        assert!(state.occupied(Cell::new(0, 6)));
        assert!(!state.occupied(Cell::new(8, 5)));
    }

    #[test]
    fn test_apply_hop_updates_both_views() {
        let mut state = GameState::new();
        let from = Cell::new(3, 7);
        let to = Cell::new(4, 8);

        state.apply_hop(from, to, PlayerId::One, 9);

        assert_eq!(state.marker(from), CellMarker::Empty);
        assert_eq!(state.marker(to), CellMarker::Player1);
        assert_eq!(state.piece(PlayerId::One, 9), to);
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.turn_count(), 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_advance_turn() {
        let mut state = GameState::new();
        state.set_chain(4, Direction::SouthWest);

        state.advance_turn();

        assert_eq!(state.current_player(), PlayerId::Two);
        assert_eq!(state.chain(), None);
        assert_eq!(state.turn_count(), 1);

        state.advance_turn();
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.turn_count(), 2);
    }

    #[test]
    fn test_initialize_resets_in_place() {
        let mut state = GameState::new();
        state.apply_hop(Cell::new(3, 7), Cell::new(4, 8), PlayerId::One, 9);
        state.advance_turn();

        state.initialize();

        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_winner_player_one() {
        let mut state = GameState::from_positions(PLAYER_2_START, PLAYER_1_START, PlayerId::Two).unwrap();
        assert_eq!(state.winner(), None);

        state.advance_turn();

        assert_eq!(state.winner(), Some(PlayerId::One));
    }

    #[test]
    fn test_winner_is_permanent() {
        let mut state = GameState::from_positions(PLAYER_2_START, PLAYER_1_START, PlayerId::One).unwrap();
        state.advance_turn();
        assert_eq!(state.winner(), Some(PlayerId::One));

        // Move a player 1 piece back out of the goal.
        state.apply_hop(Cell::new(13, 4), Cell::new(12, 4), PlayerId::One, 6);
        state.advance_turn();

        assert_eq!(state.winner(), Some(PlayerId::One));
    }

    #[test]
    fn test_from_positions_rejects_overlap() {
        let mut p2 = PLAYER_2_START;
        p2[0] = PLAYER_1_START[0];
        let err = GameState::from_positions(PLAYER_1_START, p2, PlayerId::One).unwrap_err();
        assert_eq!(err, StateError::PieceOverlap { cell: PLAYER_1_START[0] });
    }

    #[test]
    fn test_from_positions_rejects_off_board() {
        let mut p1 = PLAYER_1_START;
        p1[3] = Cell::new(0, 0);
        let err = GameState::from_positions(p1, PLAYER_2_START, PlayerId::One).unwrap_err();
        assert_eq!(
            err,
            StateError::PieceOffBoard {
                player: PlayerId::One,
                piece: 3,
                cell: Cell::new(0, 0)
            }
        );
    }

    #[test]
    fn test_check_invariants_detects_grid_drift() {
        let mut state = GameState::new();
        state.grid[Cell::new(8, 5).index()] = CellMarker::Player2;

        let err = state.check_invariants().unwrap_err();
        assert!(matches!(err, StateError::GridMismatch { cell, .. } if cell == Cell::new(8, 5)));
    }

    #[test]
    fn test_display_renders_rows() {
        let text = GameState::new().to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), ROWS);
        assert_eq!(lines[0].trim(), "1");
        assert_eq!(lines[16].trim(), "2");
        assert_eq!(lines[8].matches('.').count(), 9);
    }
}
