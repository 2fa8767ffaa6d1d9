//! Perft (PERFormance Test): exhaustive move-generation correctness suite.
//!
//! Each test counts the leaf nodes of the legal move tree at a given depth
//! and compares against published values. A mismatch points at a bug in
//! piece movement, castling or the king-safety filter.
//!
//! The generator emits one move per promotion square (the promotion piece is
//! chosen when the move is played) and has no en passant, so only positions
//! and depths whose published counts contain neither are used unchanged.
//!
//! Reference: <https://www.chessprogramming.org/Perft_Results>

use tiered_chess::engine::{Board, Color, RuleEngine};

/// Recursive perft: count leaf nodes at `depth`.
fn perft(board: &Board, side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = RuleEngine::new(board).legal_moves(side);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for mv in moves {
        let mut child = board.clone();
        assert!(child.apply_move(&mv), "generated move {mv} failed to apply");
        nodes += perft(&child, !side, depth - 1);
    }
    nodes
}

// =====================================================================
// Position 1: starting position
// =====================================================================

#[test]
fn perft_start_depth_1() {
    assert_eq!(perft(&Board::starting(), Color::White, 1), 20);
}

#[test]
fn perft_start_depth_2() {
    assert_eq!(perft(&Board::starting(), Color::White, 2), 400);
}

#[test]
fn perft_start_depth_3() {
    assert_eq!(perft(&Board::starting(), Color::White, 3), 8902);
}

// =====================================================================
// Position 2: "Kiwipete" (castling both ways, pins)
// =====================================================================

fn kiwipete() -> Board {
    Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap()
}

#[test]
fn perft_kiwipete_depth_1() {
    assert_eq!(perft(&kiwipete(), Color::White, 1), 48);
}

#[test]
fn kiwipete_offers_both_castles() {
    let board = kiwipete();
    let castles = RuleEngine::new(&board)
        .legal_moves(Color::White)
        .iter()
        .filter(|mv| mv.is_castling())
        .count();
    assert_eq!(castles, 2);
}

// =====================================================================
// Position 3: rook and pawn endgame with discovered checks
// =====================================================================

fn position_3() -> Board {
    Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap()
}

#[test]
fn perft_pos3_depth_1() {
    assert_eq!(perft(&position_3(), Color::White, 1), 14);
}

#[test]
fn perft_pos3_depth_2() {
    assert_eq!(perft(&position_3(), Color::White, 2), 191);
}

// =====================================================================
// Position 4: side to move in check
// =====================================================================

#[test]
fn perft_pos4_depth_1() {
    let board =
        Board::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
            .unwrap();
    assert_eq!(perft(&board, Color::White, 1), 6);
}

// =====================================================================
// Position 5: promotion by capture
// =====================================================================

#[test]
fn perft_pos5_depth_1_single_promotion_entry() {
    let board =
        Board::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap();
    // Published 44 counts d7xc8 once per promotion piece.
    assert_eq!(perft(&board, Color::White, 1), 41);
}
