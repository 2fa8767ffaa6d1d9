//! Legality and terminal-state detection.
//!
//! Pipeline:
//!   1. Ask each piece for its pseudo-legal destinations.
//!   2. Filter: apply the move on a cloned board, keep it only if the
//!      mover's king is not attacked afterwards.
//!
//! The live board is only ever read. Every hypothetical position is a clone.

use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::piece::Piece;
use crate::engine::types::{ChessError, Color, Coordinate, GameStatus, PieceKind};

/// Read-only rule queries over one board.
#[derive(Clone, Copy, Debug)]
pub struct RuleEngine<'a> {
    board: &'a Board,
}

impl<'a> RuleEngine<'a> {
    pub fn new(board: &'a Board) -> Self {
        RuleEngine { board }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    // -----------------------------------------------------------------
    // Check
    // -----------------------------------------------------------------

    /// Is the king of `color` attacked? A board without that king is never
    /// in check.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        match self.board.find_king(color) {
            Some(king) => self.board.is_square_attacked(king, !color),
            None => false,
        }
    }

    /// Would playing `mv` leave the mover's own king safe?
    pub fn is_move_legal(&self, mv: &Move) -> bool {
        let Some(piece) = self.board.piece_at(mv.from()) else {
            return false;
        };
        let color = piece.color();
        let mut scratch = self.board.clone();
        if !scratch.apply_move(mv) {
            return false;
        }
        !RuleEngine::new(&scratch).is_king_in_check(color)
    }

    // -----------------------------------------------------------------
    // Move generation
    // -----------------------------------------------------------------

    /// Legal destinations of the piece on `from`, castling included.
    pub fn legal_destinations(&self, from: Coordinate) -> Vec<Coordinate> {
        match self.board.piece_at(from) {
            Some(piece) => self
                .legal_moves_for(piece)
                .iter()
                .map(Move::to)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Legal moves of one piece, each carrying the piece's full legal
    /// destination list as it stood at generation time.
    pub fn legal_moves_for(&self, piece: &Piece) -> Vec<Move> {
        let from = piece.position();
        let promotion = (piece.kind() == PieceKind::Pawn).then_some(PieceKind::Queen);

        let mut candidates: Vec<(Coordinate, Option<(Coordinate, Coordinate)>)> = piece
            .legal_moves(self.board)
            .into_iter()
            .map(|to| (to, None))
            .collect();
        if piece.kind() == PieceKind::King {
            candidates.extend(
                self.castling_options(piece)
                    .into_iter()
                    .map(|(to, rook_from, rook_to)| (to, Some((rook_from, rook_to)))),
            );
        }

        let build = |to: Coordinate,
                     rook_hop: Option<(Coordinate, Coordinate)>,
                     menu: Vec<Coordinate>|
         -> Move {
            let promote = promotion.filter(|_| to.row() == piece.color().promotion_row());
            let mv = Move::with_legal_moves(
                from,
                to,
                *piece,
                self.board.piece_at(to).copied(),
                menu,
                promote,
            );
            match rook_hop {
                Some((rook_from, rook_to)) => mv.with_castling(rook_from, rook_to),
                None => mv,
            }
        };

        candidates.retain(|&(to, rook_hop)| self.is_move_legal(&build(to, rook_hop, Vec::new())));

        let menu: Vec<Coordinate> = candidates.iter().map(|&(to, _)| to).collect();
        candidates
            .into_iter()
            .map(|(to, rook_hop)| build(to, rook_hop, menu.clone()))
            .collect()
    }

    /// Every legal move for `color`, pieces in board scan order.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces_of(color)
            .flat_map(|piece| self.legal_moves_for(piece))
            .collect()
    }

    /// Does `color` have at least one legal move?
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces_of(color)
            .any(|piece| !self.legal_moves_for(piece).is_empty())
    }

    /// Turn a submitted `from -> to` request for `color` into the matching
    /// legal move. A pawn reaching the last row promotes to `promotion`, or
    /// to a queen when none is given.
    pub fn resolve_move(
        &self,
        color: Color,
        from: Coordinate,
        to: Coordinate,
        promotion: Option<PieceKind>,
    ) -> Result<Move, ChessError> {
        let invalid = |reason: &str| ChessError::InvalidMove {
            from: from.to_algebraic(),
            to: to.to_algebraic(),
            reason: reason.to_string(),
        };

        let piece = self
            .board
            .piece_at(from)
            .ok_or_else(|| invalid("no piece on the source square"))?;
        if piece.color() != color {
            return Err(ChessError::NotYourTurn(color));
        }
        if let Some(kind) = promotion
            && !kind.is_promotion_target()
        {
            return Err(ChessError::InvalidPromotion(kind.to_string()));
        }

        let mv = self
            .legal_moves_for(piece)
            .into_iter()
            .find(|m| m.to() == to)
            .ok_or_else(|| invalid("not a legal move"))?;

        match (mv.promotion(), promotion) {
            (None, Some(kind)) => Err(ChessError::InvalidPromotion(format!(
                "{kind} requested but {from} -> {to} is not a promotion"
            ))),
            (Some(_), Some(kind)) => Ok(Move::with_legal_moves(
                mv.from(),
                mv.to(),
                *mv.moved_piece(),
                mv.captured_piece().copied(),
                mv.legal_moves().to_vec(),
                Some(kind),
            )),
            _ => Ok(mv),
        }
    }

    // -----------------------------------------------------------------
    // Terminal states
    // -----------------------------------------------------------------

    /// In check with nothing to play. False for a side without a king.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_king_in_check(color) && !self.has_legal_move(color)
    }

    /// Not in check with nothing to play. A side with no pieces at all is
    /// not stalemated; it has simply been removed from the board.
    pub fn is_stalemate(&self, color: Color) -> bool {
        self.board.pieces_of(color).next().is_some()
            && !self.is_king_in_check(color)
            && !self.has_legal_move(color)
    }

    /// Status of `color` as the side to move.
    pub fn status(&self, color: Color) -> GameStatus {
        let in_check = self.is_king_in_check(color);
        let can_move = self.has_legal_move(color);
        match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate,
            (true, true) => GameStatus::Check,
            (false, false) if self.board.pieces_of(color).next().is_some() => {
                GameStatus::Stalemate
            }
            _ => GameStatus::Active,
        }
    }

    // -----------------------------------------------------------------
    // Castling
    // -----------------------------------------------------------------

    /// Castling destinations for an unmoved king on its home square:
    /// `(king_to, rook_from, rook_to)`.
    fn castling_options(&self, king: &Piece) -> Vec<(Coordinate, Coordinate, Coordinate)> {
        let color = king.color();
        let home = color.home_row();
        let mut options = Vec::new();
        if king.has_moved() || king.position() != Coordinate::new(home, 4) {
            return options;
        }
        if self.is_king_in_check(color) {
            return options;
        }

        // (rook column, columns that must be empty, columns the king crosses, king target, rook target)
        let sides: [(u8, &[u8], [u8; 2], u8, u8); 2] =
            [(7, &[5, 6], [5, 6], 6, 5), (0, &[1, 2, 3], [3, 2], 2, 3)];

        for (rook_col, empty, crossed, king_col, rook_to_col) in sides {
            let rook_at = Coordinate::new(home, rook_col);
            let rook_ready = self.board.piece_at(rook_at).is_some_and(|r| {
                r.kind() == PieceKind::Rook && r.color() == color && !r.has_moved()
            });
            if !rook_ready {
                continue;
            }
            let path_empty = empty
                .iter()
                .all(|&col| self.board.piece_at(Coordinate::new(home, col)).is_none());
            if !path_empty {
                continue;
            }
            let path_safe = crossed
                .iter()
                .all(|&col| !self.board.is_square_attacked(Coordinate::new(home, col), !color));
            if !path_safe {
                continue;
            }
            options.push((
                Coordinate::new(home, king_col),
                rook_at,
                Coordinate::new(home, rook_to_col),
            ));
        }
        options
    }
}

// =========================================================================
// Tests
// =========================================================================
