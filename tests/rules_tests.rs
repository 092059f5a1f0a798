//! Rules integration tests: geometry, masks, skip chains, win detection.

use chinese_checkers::board::{
    double_step, is_valid_cell, is_valid_coords, neighbor, valid_cells, Cell, Direction, COLS, END_TURN,
    MIN_MAX_COLS, N_DIRECTIONS, N_MOVES, PLAYER_1_START, PLAYER_2_START, ROWS,
};
use chinese_checkers::core::{CellMarker, GameState, Move, MoveOutcome, PlayerId};
use chinese_checkers::rules::{ChineseCheckers, RulesEngine, RulesError};

const RULES: ChineseCheckers = ChineseCheckers;

/// Player 1's piece 0 moved to (8,4) with player 2's piece 0 at (8,5).
fn facing_pieces() -> GameState {
    let mut p1 = PLAYER_1_START;
    p1[0] = Cell::new(8, 4);
    let mut p2 = PLAYER_2_START;
    p2[0] = Cell::new(8, 5);
    GameState::from_positions(p1, p2, PlayerId::One).unwrap()
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_validity_matches_column_ranges() {
    for row in 0..ROWS as i32 {
        let (lo, hi) = MIN_MAX_COLS[row as usize];
        for col in 0..COLS as i32 {
            let inside = col >= i32::from(lo) && col <= i32::from(hi);
            assert_eq!(is_valid_coords(row, col), inside, "({}, {})", row, col);
        }
    }
    assert!(!is_valid_coords(-1, 6));
    assert!(!is_valid_coords(17, 6));
    assert!(!is_valid_coords(8, 13));
    assert!(!is_valid_coords(i32::MAX, 0));
}

#[test]
fn test_step_then_opposite_returns() {
    for cell in valid_cells() {
        for direction in Direction::ALL {
            let next = neighbor(cell, direction);
            if is_valid_cell(next) {
                assert_eq!(neighbor(next, direction.opposite()), cell);
            }
        }
    }
}

#[test]
fn test_double_step_is_two_single_steps() {
    for cell in valid_cells() {
        for direction in Direction::ALL {
            let mid = neighbor(cell, direction);
            if !is_valid_cell(mid) {
                continue;
            }
            assert_eq!(double_step(cell, direction), neighbor(mid, direction));
        }
    }
}

// =============================================================================
// Initial Position
// =============================================================================

#[test]
fn test_initial_state() {
    let state = GameState::new();

    assert_eq!(state.current_player(), PlayerId::One);
    assert_eq!(state.winner(), None);
    assert_eq!(state.turn_count(), 0);
    assert!(!state.is_chaining());

    for (player, marker, rows) in [
        (PlayerId::One, CellMarker::Player1, 0..=3),
        (PlayerId::Two, CellMarker::Player2, 13..=16),
    ] {
        for &cell in state.pieces(player) {
            assert!(rows.contains(&cell.row));
            assert_eq!(state.marker(cell), marker);
        }
    }
}

#[test]
fn test_initial_mask_has_no_end_turn() {
    let mask = RULES.compute_action_mask(&GameState::new());
    assert!(!mask.is_set(END_TURN));
    assert!(mask.count() > 0);
}

#[test]
fn test_corner_piece_steps_into_open_field() {
    let state = GameState::new();
    let mask = RULES.compute_action_mask(&state);

    assert_eq!(state.piece(PlayerId::One, 9), Cell::new(3, 7));
    assert!(mask.contains(Move::hop(9, Direction::SouthEast)));
    assert!(mask.contains(Move::hop(9, Direction::SouthWest)));
    for direction in [Direction::NorthEast, Direction::East, Direction::West, Direction::NorthWest] {
        assert!(!mask.contains(Move::hop(9, direction)), "{}", direction);
    }
}

// =============================================================================
// Skip Chains
// =============================================================================

#[test]
fn test_jump_keeps_turn() {
    let mut state = facing_pieces();
    let outcome = RULES.apply_move(&mut state, Move::hop(0, Direction::East)).unwrap();

    assert_eq!(
        outcome,
        MoveOutcome::Jump {
            from: Cell::new(8, 4),
            to: Cell::new(8, 6)
        }
    );
    assert_eq!(state.current_player(), PlayerId::One);
    assert_eq!(state.turn_count(), 0);
    assert_eq!(state.marker(Cell::new(8, 4)), CellMarker::Empty);
    assert_eq!(state.marker(Cell::new(8, 6)), CellMarker::Player1);
}

#[test]
fn test_reversal_is_masked() {
    let mut state = facing_pieces();
    RULES.apply_move(&mut state, Move::hop(0, Direction::East)).unwrap();

    let mask = RULES.compute_action_mask(&state);
    let back = Move::hop(0, Direction::East.opposite());

    assert_eq!(Direction::East.opposite(), Direction::West);
    assert!(!mask.contains(back));
    assert!(matches!(
        RULES.apply_move(&mut state, back),
        Err(RulesError::ReversesChain { .. })
    ));
}

#[test]
fn test_chain_masks_other_pieces() {
    let mut state = facing_pieces();
    RULES.apply_move(&mut state, Move::hop(0, Direction::East)).unwrap();

    let mask = RULES.compute_action_mask(&state);
    for index in N_DIRECTIONS..END_TURN {
        assert!(!mask.is_set(index), "slot {} should be masked mid-chain", index);
    }
    assert!(mask.is_set(END_TURN));
}

#[test]
fn test_multi_jump_chain() {
    // Piece 0 at (8,2); opponents at (8,3) and (8,5) leave (8,4) and (8,6) open.
    let mut p1 = PLAYER_1_START;
    p1[0] = Cell::new(8, 2);
    let mut p2 = PLAYER_2_START;
    p2[0] = Cell::new(8, 3);
    p2[1] = Cell::new(8, 5);
    let mut state = GameState::from_positions(p1, p2, PlayerId::One).unwrap();

    RULES.apply_move(&mut state, Move::hop(0, Direction::East)).unwrap();
    assert!(RULES.is_legal(&state, Move::hop(0, Direction::East)));
    RULES.apply_move(&mut state, Move::hop(0, Direction::East)).unwrap();

    assert_eq!(state.piece(PlayerId::One, 0), Cell::new(8, 6));
    assert_eq!(state.turn_count(), 0);

    RULES.apply_move(&mut state, Move::EndTurn).unwrap();
    assert_eq!(state.turn_count(), 1);
    assert_eq!(state.current_player(), PlayerId::Two);
    state.check_invariants().unwrap();
}

#[test]
fn test_end_turn_only_mid_chain() {
    let mut state = GameState::new();
    assert_eq!(
        RULES.apply_move(&mut state, Move::EndTurn),
        Err(RulesError::EndTurnWithoutChain)
    );

    let mut state = facing_pieces();
    RULES.apply_move(&mut state, Move::hop(0, Direction::East)).unwrap();
    RULES.apply_move(&mut state, Move::EndTurn).unwrap();

    assert_eq!(state.turn_count(), 1);
    assert_eq!(state.current_player(), PlayerId::Two);
    assert_eq!(state.chain(), None);

    let flat = state.to_flat();
    assert_eq!(flat[262], -1);
    assert_eq!(flat[263], -1);
}

// =============================================================================
// Winning
// =============================================================================

#[test]
fn test_player_two_wins() {
    // Player 2 sits in player 1's home; player 1 is elsewhere in the middle.
    let p1: [Cell; 10] = std::array::from_fn(|i| Cell::new(6, 1 + i as i8));
    let mut state = GameState::from_positions(p1, PLAYER_1_START, PlayerId::Two).unwrap();
    assert_eq!(state.winner(), None);

    state.advance_turn();
    assert_eq!(state.winner(), Some(PlayerId::Two));
    assert!(RULES.is_terminal(&state));
}

#[test]
fn test_win_survives_later_moves() {
    let mut state = GameState::from_positions(PLAYER_2_START, PLAYER_1_START, PlayerId::One).unwrap();
    state.advance_turn();
    assert_eq!(state.winner(), Some(PlayerId::One));

    // Play continues; the winner never resets.
    for _ in 0..20 {
        let Some(&mv) = RULES.legal_moves(&state).first() else {
            break;
        };
        RULES.apply_move(&mut state, mv).unwrap();
    }
    assert_eq!(state.winner(), Some(PlayerId::One));
}

#[test]
fn test_every_mask_slot_agrees_with_check() {
    let mut state = GameState::new();
    let moves = [
        Move::hop(9, Direction::SouthEast),
        Move::hop(9, Direction::NorthWest),
        Move::hop(3, Direction::SouthEast),
    ];
    for mv in moves {
        let mask = RULES.compute_action_mask(&state);
        for index in 0..N_MOVES {
            let slot = Move::from_index(index).unwrap();
            assert_eq!(mask.is_set(index), RULES.is_legal(&state, slot));
        }
        if RULES.apply_move(&mut state, mv).is_err() {
            break;
        }
    }
}
