//! Static position scoring used by the strategy ladder and the hint layer.
//!
//! Scores are in material units (pawn = 1) from one side's perspective.
//! Components:
//!   1. Material balance
//!   2. Centre proximity of a square
//!   3. Exposure: own pieces left en prise

use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::types::{Color, Coordinate, PieceKind};

/// The four central squares (d5, e5, d4, e4).
pub const CENTER: [(u8, u8); 4] = [(3, 3), (3, 4), (4, 3), (4, 4)];

/// Bonus that ranks a mating move above everything else.
pub const MATE_BONUS: i32 = 100_000;

// =========================================================================
// Material
// =========================================================================

/// Sum of the values of `color`'s pieces (king included).
pub fn material(board: &Board, color: Color) -> i32 {
    board.pieces_of(color).map(|p| p.value()).sum()
}

/// Own material minus the opponent's. Kings cancel out while both stand.
pub fn material_balance(board: &Board, color: Color) -> i32 {
    material(board, color) - material(board, !color)
}

// =========================================================================
// Centre
// =========================================================================

#[inline]
pub fn is_center(at: Coordinate) -> bool {
    CENTER.contains(&(at.row(), at.col()))
}

/// 3 on the four central squares, falling by one per ring outward to 0 on
/// the edge.
pub fn center_score(at: Coordinate) -> i32 {
    let ring = |i: u8| -> i32 {
        let i = i as i32;
        (i - 3).abs().min((i - 4).abs())
    };
    3 - ring(at.row()).max(ring(at.col()))
}

// =========================================================================
// Exposure
// =========================================================================

/// Is the piece on `at` loose: attacked by an opposing piece worth at least
/// as much as it is, or attacked at all while its own side does not cover
/// the square?
pub fn is_loose(board: &Board, at: Coordinate) -> bool {
    let Some(piece) = board.piece_at(at) else {
        return false;
    };
    let mut attackers = board.attackers(at, !piece.color()).peekable();
    if attackers.peek().is_none() {
        return false;
    }
    let outweighed = attackers.any(|a| a.value() >= piece.value());
    outweighed || !board.is_square_covered(at, piece.color())
}

/// Total value of `color`'s non-king pieces that are loose.
pub fn exposed_material(board: &Board, color: Color) -> i32 {
    board
        .pieces_of(color)
        .filter(|p| p.kind() != PieceKind::King)
        .filter(|p| is_loose(board, p.position()))
        .map(|p| p.value())
        .sum()
}

// =========================================================================
// Simulation helpers
// =========================================================================

/// The position after `mv`, on a fresh clone.
pub fn simulate(board: &Board, mv: &Move) -> Board {
    let mut next = board.clone();
    next.apply_move(mv);
    next
}

/// Does `mv` leave the moved piece loose on its landing square?
pub fn lands_loose(board: &Board, mv: &Move) -> bool {
    is_loose(&simulate(board, mv), mv.to())
}

/// Material balance after `mv`, penalised by what the mover leaves hanging.
pub fn defensive_score(board: &Board, mv: &Move) -> i32 {
    let color = mv.moved_piece().color();
    let next = simulate(board, mv);
    2 * material_balance(&next, color) - exposed_material(&next, color)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn c(name: &str) -> Coordinate {
        Coordinate::from_algebraic(name).unwrap()
    }

    #[test]
    fn starting_position_is_balanced() {
        let board = Board::starting();
        assert_eq!(material_balance(&board, Color::White), 0);
        assert_eq!(material(&board, Color::Black), 8 + 6 + 6 + 10 + 9 + 1000);
    }

    #[test]
    fn extra_queen_shows_in_balance() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/3QK3").unwrap();
        assert_eq!(material_balance(&board, Color::White), 9);
        assert_eq!(material_balance(&board, Color::Black), -9);
    }

    #[test]
    fn center_scores() {
        assert_eq!(center_score(c("d4")), 3);
        assert_eq!(center_score(c("e5")), 3);
        assert_eq!(center_score(c("c3")), 2);
        assert_eq!(center_score(c("f6")), 2);
        assert_eq!(center_score(c("b7")), 1);
        assert_eq!(center_score(c("a1")), 0);
        assert_eq!(center_score(c("h4")), 0);
        assert!(is_center(c("e4")));
        assert!(!is_center(c("e3")));
    }

    #[test]
    fn undefended_attacked_piece_is_loose() {
        let board = Board::from_fen("4k3/8/8/3r4/8/8/3Q4/4K3").unwrap();
        assert!(is_loose(&board, c("d5")));
        assert!(!is_loose(&board, c("d4")));
        assert!(!is_loose(&board, c("e1")));
    }

    #[test]
    fn defended_piece_is_loose_only_to_equal_or_bigger_attackers() {
        // Black knight d5 defended by pawn e6, attacked only by a pawn on c4.
        let board = Board::from_fen("4k3/8/4p3/3n4/2P5/8/8/4K3").unwrap();
        assert!(!is_loose(&board, c("d5")));
        // The queen on d2 is worth more than the knight.
        let board = Board::from_fen("4k3/8/4p3/3n4/8/8/3Q4/4K3").unwrap();
        assert!(is_loose(&board, c("d5")));
    }

    #[test]
    fn defended_square_attacked_by_queen_is_loose_landing() {
        // Nf3-d4 is covered by the pawn on e3 but the queen on d8 hits d4.
        let board = Board::from_fen("3q3k/8/8/8/8/4PN2/8/K7").unwrap();
        let knight = *board.piece_at(c("f3")).unwrap();
        let mv = Move::new(c("f3"), c("d4"), knight, None);
        assert!(lands_loose(&board, &mv));
        // g1 is out of the queen's reach.
        let mv = Move::new(c("f3"), c("g1"), knight, None);
        assert!(!lands_loose(&board, &mv));
    }

    #[test]
    fn exposed_material_sums_loose_pieces() {
        let board = Board::from_fen("4k3/8/8/3r4/8/8/3Q4/4K3").unwrap();
        assert_eq!(exposed_material(&board, Color::Black), 5);
        // Queen d2 is attacked by the smaller rook and defended by the king.
        assert_eq!(exposed_material(&board, Color::White), 0);
    }

    #[test]
    fn simulate_leaves_original_untouched() {
        let board = Board::starting();
        let pawn = *board.piece_at(c("e2")).unwrap();
        let mv = Move::new(c("e2"), c("e4"), pawn, None);
        let next = simulate(&board, &mv);
        assert!(next.piece_at(c("e4")).is_some());
        assert!(board.piece_at(c("e4")).is_none());
    }
}
