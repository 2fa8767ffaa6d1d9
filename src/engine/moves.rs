//! Move records.
//!
//! A [`Move`] is an immutable snapshot of one ply. The pieces it holds are
//! copies taken when the move was generated, so later board mutation never
//! rewrites history.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::board::Square;
use crate::engine::piece::Piece;
use crate::engine::types::{ChessError, Coordinate, PieceKind};

static LAST_TIMESTAMP: AtomicU64 = AtomicU64::new(0);

/// Nanosecond wall-clock stamp, bumped so that successive calls are strictly
/// increasing even within one clock tick. Never zero.
fn next_timestamp() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut prev = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_TIMESTAMP.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// One ply: endpoints, the pieces involved, and optional promotion or
/// castling companion rook hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    from: Coordinate,
    to: Coordinate,
    moved_piece: Piece,
    captured_piece: Option<Piece>,
    legal_moves: Vec<Coordinate>,
    promotion: Option<PieceKind>,
    rook_from: Option<Coordinate>,
    rook_to: Option<Coordinate>,
    timestamp: u64,
}

impl Move {
    /// Minimal move: no recorded destination menu, no promotion.
    ///
    /// # Panics
    ///
    /// Panics if `from == to`; a move must go somewhere.
    pub fn new(
        from: Coordinate,
        to: Coordinate,
        moved_piece: Piece,
        captured_piece: Option<Piece>,
    ) -> Self {
        Self::with_legal_moves(from, to, moved_piece, captured_piece, Vec::new(), None)
    }

    /// Move carrying the destinations the mover had available when it was
    /// generated, plus an optional promotion.
    ///
    /// # Panics
    ///
    /// Panics if `from == to`.
    pub fn with_legal_moves(
        from: Coordinate,
        to: Coordinate,
        moved_piece: Piece,
        captured_piece: Option<Piece>,
        legal_moves: Vec<Coordinate>,
        promotion: Option<PieceKind>,
    ) -> Self {
        assert_ne!(from, to, "move must change squares: {from} -> {to}");
        Move {
            from,
            to,
            moved_piece,
            captured_piece,
            legal_moves,
            promotion,
            rook_from: None,
            rook_to: None,
            timestamp: next_timestamp(),
        }
    }

    /// Derive endpoints and pieces from two squares.
    pub fn from_squares(from: &Square, to: &Square) -> Result<Self, ChessError> {
        let moved = from.piece().copied().ok_or_else(|| {
            ChessError::InconsistentMove(format!("no piece on {}", from.coordinate()))
        })?;
        if from.coordinate() == to.coordinate() {
            return Err(ChessError::InconsistentMove(format!(
                "source and destination are both {}",
                from.coordinate()
            )));
        }
        Ok(Self::new(
            from.coordinate(),
            to.coordinate(),
            moved,
            to.piece().copied(),
        ))
    }

    /// Attach the rook hop that accompanies a castling king move.
    pub fn with_castling(mut self, rook_from: Coordinate, rook_to: Coordinate) -> Self {
        self.rook_from = Some(rook_from);
        self.rook_to = Some(rook_to);
        self
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    #[inline]
    pub fn from(&self) -> Coordinate {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Coordinate {
        self.to
    }

    #[inline]
    pub fn moved_piece(&self) -> &Piece {
        &self.moved_piece
    }

    #[inline]
    pub fn captured_piece(&self) -> Option<&Piece> {
        self.captured_piece.as_ref()
    }

    /// Destinations the mover had when this move was generated.
    #[inline]
    pub fn legal_moves(&self) -> &[Coordinate] {
        &self.legal_moves
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub fn rook_from(&self) -> Option<Coordinate> {
        self.rook_from
    }

    #[inline]
    pub fn rook_to(&self) -> Option<Coordinate> {
        self.rook_to
    }

    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured_piece.is_some()
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        self.rook_from.is_some()
    }

    /// Material value of the captured piece, zero for quiet moves.
    #[inline]
    pub fn captured_value(&self) -> i32 {
        self.captured_piece.map_or(0, |p| p.value())
    }

    /// Same endpoints and promotion, ignoring pieces and timestamp.
    pub fn same_action(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

/// Coordinate notation: `e2e4`, `e7e8=Q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from.to_algebraic(), self.to.to_algebraic())?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.symbol())?;
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::board::Board;
    use crate::engine::types::Color;

    fn c(name: &str) -> Coordinate {
        Coordinate::from_algebraic(name).unwrap()
    }

    fn pawn_at(name: &str) -> Piece {
        Piece::new(Color::White, PieceKind::Pawn, c(name))
    }

    #[test]
    fn minimal_constructor_defaults() {
        let mv = Move::new(c("e2"), c("e4"), pawn_at("e2"), None);
        assert!(mv.legal_moves().is_empty());
        assert_eq!(mv.promotion(), None);
        assert!(!mv.is_capture());
        assert!(!mv.is_castling());
        assert!(mv.timestamp() > 0);
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn enhanced_constructor_keeps_menu_and_promotion() {
        let menu = vec![c("e8"), c("d8")];
        let mv = Move::with_legal_moves(
            c("e7"),
            c("e8"),
            pawn_at("e7"),
            None,
            menu.clone(),
            Some(PieceKind::Queen),
        );
        assert_eq!(mv.legal_moves(), menu.as_slice());
        assert_eq!(mv.promotion(), Some(PieceKind::Queen));
        assert_eq!(mv.to_string(), "e7e8=Q");
    }

    #[test]
    fn menu_is_not_shared_with_caller() {
        let mut menu = vec![c("e3"), c("e4")];
        let mv = Move::with_legal_moves(c("e2"), c("e4"), pawn_at("e2"), None, menu.clone(), None);
        menu.clear();
        assert_eq!(mv.legal_moves().len(), 2);
    }

    #[test]
    fn timestamps_strictly_increase() {
        let a = Move::new(c("e2"), c("e3"), pawn_at("e2"), None);
        let b = Move::new(c("e2"), c("e4"), pawn_at("e2"), None);
        let d = Move::new(c("d2"), c("d4"), pawn_at("d2"), None);
        assert!(a.timestamp() < b.timestamp());
        assert!(b.timestamp() < d.timestamp());
    }

    #[test]
    fn from_squares_reads_board() {
        let board = Board::from_fen("8/8/8/3p4/4N3/8/8/8").unwrap();
        let mv = Move::from_squares(board.square(c("e4")), board.square(c("d5")))
            .unwrap();
        assert_eq!(mv.moved_piece().kind(), PieceKind::Knight);
        assert_eq!(mv.captured_piece().unwrap().kind(), PieceKind::Pawn);
        assert_eq!(mv.captured_value(), 1);
    }

    #[test]
    fn from_squares_rejects_empty_origin() {
        let board = Board::new();
        let err = Move::from_squares(board.square(c("e4")), board.square(c("e5")));
        assert!(matches!(err, Err(ChessError::InconsistentMove(_))));
    }

    #[test]
    #[should_panic]
    fn zero_length_move_panics() {
        let _ = Move::new(c("e2"), c("e2"), pawn_at("e2"), None);
    }

    #[test]
    fn stored_piece_is_a_snapshot() {
        let mut board = Board::starting();
        let mv = Move::new(c("e2"), c("e4"), *board.piece_at(c("e2")).unwrap(), None);
        board.apply_move(&mv);
        assert!(!mv.moved_piece().has_moved());
        assert_eq!(mv.moved_piece().position(), c("e2"));
        assert!(board.piece_at(c("e4")).unwrap().has_moved());
    }

    #[test]
    fn castling_companion() {
        let king = Piece::new(Color::White, PieceKind::King, c("e1"));
        let mv = Move::new(c("e1"), c("g1"), king, None).with_castling(c("h1"), c("f1"));
        assert!(mv.is_castling());
        assert_eq!(mv.rook_from(), Some(c("h1")));
        assert_eq!(mv.rook_to(), Some(c("f1")));
    }
}
