//! Pieces and their pseudo-legal movement rules.
//!
//! A [`Piece`] is a small value (colour, kind, square, moved flag). Movement
//! is dispatched on [`PieceKind`], so the variant set stays closed. Nothing
//! here knows about check; that filtering lives in the rule engine.

use crate::engine::board::Board;
use crate::engine::types::{Color, Coordinate, PieceKind};

// =========================================================================
// Direction tables
// =========================================================================

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ORTHOGONALS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =========================================================================
// Piece
// =========================================================================

/// A piece standing on the board.
///
/// `Clone`/`Copy` produce an independent piece with the same colour,
/// position and moved flag; this is what move records store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    position: Coordinate,
    has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind, position: Coordinate) -> Self {
        Piece {
            color,
            kind,
            position,
            has_moved: false,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Coordinate {
        self.position
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// One-letter code (uppercase, colour-independent).
    #[inline]
    pub fn symbol(&self) -> char {
        self.kind.symbol()
    }

    /// Material weight of this piece.
    #[inline]
    pub fn value(&self) -> i32 {
        self.kind.value()
    }

    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }

    pub fn set_has_moved(&mut self, has_moved: bool) {
        self.has_moved = has_moved;
    }

    // -----------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------

    /// Pseudo-legal destinations from the current square. Ignores whether the
    /// move would leave this side's king in check.
    pub fn legal_moves(&self, board: &Board) -> Vec<Coordinate> {
        let mut out = Vec::with_capacity(28);
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(board, &mut out),
            PieceKind::Knight => self.step_moves(board, &KNIGHT_OFFSETS, &mut out),
            PieceKind::King => self.step_moves(board, &KING_OFFSETS, &mut out),
            PieceKind::Bishop => self.ray_moves(board, &DIAGONALS, &mut out),
            PieceKind::Rook => self.ray_moves(board, &ORTHOGONALS, &mut out),
            PieceKind::Queen => {
                self.ray_moves(board, &DIAGONALS, &mut out);
                self.ray_moves(board, &ORTHOGONALS, &mut out);
            }
        }
        out
    }

    /// Does this piece attack `target`?
    ///
    /// Matches membership in [`Piece::legal_moves`] for every occupied
    /// target. Pawns additionally attack the empty squares diagonally ahead
    /// of them, which is what castling-path safety needs.
    pub fn is_attacking(&self, board: &Board, target: Coordinate) -> bool {
        !self.is_friendly_at(board, target) && self.covers(board, target)
    }

    /// Could this piece capture on `target` if an enemy stood there?
    /// Unlike [`Piece::is_attacking`] this is true for friendly-occupied
    /// targets, so it answers "is that square defended".
    pub fn covers(&self, board: &Board, target: Coordinate) -> bool {
        if target == self.position {
            return false;
        }
        let d_row = target.row() as i32 - self.position.row() as i32;
        let d_col = target.col() as i32 - self.position.col() as i32;

        match self.kind {
            PieceKind::Pawn => d_row == self.color.forward() && d_col.abs() == 1,
            PieceKind::Knight => KNIGHT_OFFSETS.contains(&(d_row, d_col)),
            PieceKind::King => d_row.abs() <= 1 && d_col.abs() <= 1,
            PieceKind::Bishop => d_row.abs() == d_col.abs() && self.ray_clear(board, target),
            PieceKind::Rook => (d_row == 0 || d_col == 0) && self.ray_clear(board, target),
            PieceKind::Queen => {
                (d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs())
                    && self.ray_clear(board, target)
            }
        }
    }

    // -----------------------------------------------------------------
    // Internal generators
    // -----------------------------------------------------------------

    fn is_friendly_at(&self, board: &Board, at: Coordinate) -> bool {
        board
            .piece_at(at)
            .is_some_and(|other| other.color == self.color)
    }

    fn pawn_moves(&self, board: &Board, out: &mut Vec<Coordinate>) {
        let dir = self.color.forward();

        if let Some(one) = self.position.offset(dir, 0)
            && board.piece_at(one).is_none()
        {
            out.push(one);
            if !self.has_moved
                && let Some(two) = self.position.offset(2 * dir, 0)
                && board.piece_at(two).is_none()
            {
                out.push(two);
            }
        }

        for d_col in [-1, 1] {
            if let Some(diag) = self.position.offset(dir, d_col)
                && board
                    .piece_at(diag)
                    .is_some_and(|other| other.color != self.color)
            {
                out.push(diag);
            }
        }
    }

    fn step_moves(&self, board: &Board, offsets: &[(i32, i32)], out: &mut Vec<Coordinate>) {
        for &(d_row, d_col) in offsets {
            if let Some(to) = self.position.offset(d_row, d_col)
                && !self.is_friendly_at(board, to)
            {
                out.push(to);
            }
        }
    }

    fn ray_moves(&self, board: &Board, directions: &[(i32, i32)], out: &mut Vec<Coordinate>) {
        for &(d_row, d_col) in directions {
            let mut cursor = self.position;
            while let Some(next) = cursor.offset(d_row, d_col) {
                match board.piece_at(next) {
                    None => out.push(next),
                    Some(other) => {
                        if other.color != self.color {
                            out.push(next);
                        }
                        break;
                    }
                }
                cursor = next;
            }
        }
    }

    /// Every square strictly between `position` and `target` is empty.
    /// Assumes the two squares share a row, column or diagonal.
    fn ray_clear(&self, board: &Board, target: Coordinate) -> bool {
        let step_row = (target.row() as i32 - self.position.row() as i32).signum();
        let step_col = (target.col() as i32 - self.position.col() as i32).signum();
        let mut cursor = self.position;
        while let Some(next) = cursor.offset(step_row, step_col) {
            if next == target {
                return true;
            }
            if board.piece_at(next).is_some() {
                return false;
            }
            cursor = next;
        }
        false
    }
}

// =========================================================================
// Tests
// =========================================================================
