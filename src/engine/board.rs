//! The 8×8 grid of squares.
//!
//! `Board` owns its squares and, through them, every piece in play. It knows
//! how to relocate pieces but not whether a relocation is legal in the
//! check sense; that is the rule engine's job. Speculative work (legality
//! simulation, AI lookahead) always happens on a `clone()`.

use crate::engine::moves::Move;
use crate::engine::piece::Piece;
use crate::engine::types::{COLUMNS, ChessError, Color, Coordinate, PieceKind, ROWS};

/// Piece placement of the standard starting position.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// One cell of the board holding at most one piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Square {
    coordinate: Coordinate,
    piece: Option<Piece>,
}

impl Square {
    pub fn new(coordinate: Coordinate) -> Self {
        Square {
            coordinate,
            piece: None,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub fn row(&self) -> u8 {
        self.coordinate.row()
    }

    #[inline]
    pub fn col(&self) -> u8 {
        self.coordinate.col()
    }

    #[inline]
    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    /// Overwrite the occupant. No validation happens at this layer.
    #[inline]
    pub fn set_piece(&mut self, piece: Option<Piece>) {
        self.piece = piece;
    }

    #[inline]
    fn take_piece(&mut self) -> Option<Piece> {
        self.piece.take()
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// An 8×8 chess board.
///
/// `clone()` is a deep copy: the squares and pieces of the copy are
/// independent of the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Square; COLUMNS]; ROWS],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board {
            squares: std::array::from_fn(|row| {
                std::array::from_fn(|col| Square::new(Coordinate::new(row as u8, col as u8)))
            }),
        }
    }

    /// A board set up in the standard starting position.
    pub fn starting() -> Self {
        let mut board = Board::new();
        board.initialize_board();
        board
    }

    /// Reset to the standard starting position.
    pub fn initialize_board(&mut self) {
        self.clear();
        for color in [Color::White, Color::Black] {
            let home = color.home_row();
            let pawns = color.pawn_row();
            for (col, kind) in BACK_RANK.iter().enumerate() {
                let col = col as u8;
                let back = Coordinate::new(home, col);
                self.set_piece(back, Piece::new(color, *kind, back));
                let front = Coordinate::new(pawns, col);
                self.set_piece(front, Piece::new(color, PieceKind::Pawn, front));
            }
        }
    }

    /// Remove every piece.
    pub fn clear(&mut self) {
        for square in self.squares.iter_mut().flatten() {
            square.set_piece(None);
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// The full grid, row 0 first.
    pub fn squares(&self) -> &[[Square; COLUMNS]; ROWS] {
        &self.squares
    }

    #[inline]
    pub fn square(&self, at: Coordinate) -> &Square {
        &self.squares[at.row() as usize][at.col() as usize]
    }

    /// The piece on a square, if any.
    #[inline]
    pub fn piece_at(&self, at: Coordinate) -> Option<&Piece> {
        self.square(at).piece()
    }

    /// Bounds-tolerant lookup by raw indices.
    pub fn get_piece_at(&self, row: i32, col: i32) -> Option<&Piece> {
        Coordinate::checked(row, col).and_then(|at| self.piece_at(at))
    }

    /// All pieces, scanned row 0→7 and column 0→7.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().filter_map(Square::piece)
    }

    /// All pieces of one colour, in board scan order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.color() == color)
    }

    /// Where the king of `color` stands, if it is on the board at all.
    pub fn find_king(&self, color: Color) -> Option<Coordinate> {
        self.pieces_of(color)
            .find(|p| p.kind() == PieceKind::King)
            .map(Piece::position)
    }

    /// Is `at` attacked by any piece of colour `by`?
    pub fn is_square_attacked(&self, at: Coordinate, by: Color) -> bool {
        self.pieces_of(by).any(|p| p.is_attacking(self, at))
    }

    /// Is `at` covered by any piece of colour `by`, counting defence of a
    /// friendly piece standing there?
    pub fn is_square_covered(&self, at: Coordinate, by: Color) -> bool {
        self.pieces_of(by).any(|p| p.covers(self, at))
    }

    /// Pieces of colour `by` attacking `at`, in board scan order.
    pub fn attackers(&self, at: Coordinate, by: Color) -> impl Iterator<Item = &Piece> {
        self.pieces_of(by).filter(move |p| p.is_attacking(self, at))
    }

    // -----------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------

    /// Place a piece, overwriting any occupant. The piece's position is
    /// updated to `at` so placement and square always agree.
    pub fn set_piece(&mut self, at: Coordinate, mut piece: Piece) {
        piece.set_position(at);
        self.squares[at.row() as usize][at.col() as usize].set_piece(Some(piece));
    }

    /// Remove and return the piece on `at`.
    pub fn remove_piece(&mut self, at: Coordinate) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize].take_piece()
    }

    /// Relocate the piece on `from` to `to`, capturing whatever stands there.
    ///
    /// Returns `false` without touching the board when an endpoint is off the
    /// board or `from` is empty. With `validate` set, the destination must
    /// also be one of the piece's pseudo-legal moves. A pawn that lands on
    /// its last row becomes `promotion` (a queen when absent or not a valid
    /// promotion target).
    pub fn move_piece(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
        promotion: Option<PieceKind>,
        validate: bool,
    ) -> bool {
        let (Some(from), Some(to)) = (
            Coordinate::checked(from_row, from_col),
            Coordinate::checked(to_row, to_col),
        ) else {
            return false;
        };
        let Some(piece) = self.piece_at(from).copied() else {
            return false;
        };
        if validate && !piece.legal_moves(self).contains(&to) {
            return false;
        }

        let mut piece = piece;
        self.remove_piece(from);
        piece.set_has_moved(true);
        if piece.kind() == PieceKind::Pawn && to.row() == piece.color().promotion_row() {
            let target = promotion
                .filter(|k| k.is_promotion_target())
                .unwrap_or(PieceKind::Queen);
            piece.set_kind(target);
        }
        self.set_piece(to, piece);
        true
    }

    /// Apply a move record, including the rook hop of a castling move.
    pub fn apply_move(&mut self, mv: &Move) -> bool {
        let (from, to) = (mv.from(), mv.to());
        if !self.move_piece(
            from.row() as i32,
            from.col() as i32,
            to.row() as i32,
            to.col() as i32,
            mv.promotion(),
            false,
        ) {
            return false;
        }
        if let (Some(rook_from), Some(rook_to)) = (mv.rook_from(), mv.rook_to()) {
            return self.move_piece(
                rook_from.row() as i32,
                rook_from.col() as i32,
                rook_to.row() as i32,
                rook_to.col() as i32,
                None,
                false,
            );
        }
        true
    }

    // -----------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------

    /// Render the board as text (rank 8 on top), useful for logs and tests.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for (row, squares) in self.squares.iter().enumerate() {
            s.push((b'8' - row as u8) as char);
            s.push(' ');
            for (col, square) in squares.iter().enumerate() {
                s.push(match square.piece() {
                    Some(p) => p.kind().to_char(p.color()),
                    None => '.',
                });
                if col < COLUMNS - 1 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// FEN placement loading
// ---------------------------------------------------------------------------

impl Board {
    /// Build a board from FEN piece placement, optionally followed by the
    /// remaining FEN fields.
    ///
    /// Only placement and the castling field are used. Pawns off their home
    /// row count as moved. A king or rook counts as unmoved only when the
    /// castling field grants a right that involves it; with no castling
    /// field no such rights exist.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let Some(placement) = fields.first() else {
            return Err(ChessError::InvalidFen("empty string".to_string()));
        };
        let castling = fields.get(2).copied().unwrap_or("-");

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != ROWS {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::new();
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: u8 = 0;
            for ch in rank_str.chars() {
                if col as usize >= COLUMNS {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        8 - row
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            8 - row
                        )));
                    }
                    col += digit as u8;
                } else if let Some((color, kind)) = PieceKind::from_char(ch) {
                    let at = Coordinate::new(row as u8, col);
                    board.set_piece(at, Piece::new(color, kind, at));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if col as usize != COLUMNS {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {col} squares instead of 8",
                    8 - row
                )));
            }
        }

        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(ChessError::InvalidFen(format!(
                "invalid castling string: '{castling}'"
            )));
        }

        let unmoved = |color: Color, piece: &Piece| -> bool {
            let home = color.home_row();
            let (king_side, queen_side) = match color {
                Color::White => ('K', 'Q'),
                Color::Black => ('k', 'q'),
            };
            let at = piece.position();
            if at.row() != home {
                return false;
            }
            match (piece.kind(), at.col()) {
                (PieceKind::King, 4) => {
                    castling.contains(king_side) || castling.contains(queen_side)
                }
                (PieceKind::Rook, 7) => castling.contains(king_side),
                (PieceKind::Rook, 0) => castling.contains(queen_side),
                _ => false,
            }
        };

        let snapshot: Vec<Piece> = board.pieces().copied().collect();
        for mut piece in snapshot {
            let moved = match piece.kind() {
                PieceKind::Pawn => piece.position().row() != piece.color().pawn_row(),
                PieceKind::King | PieceKind::Rook => !unmoved(piece.color(), &piece),
                _ => false,
            };
            piece.set_has_moved(moved);
            board.set_piece(piece.position(), piece);
        }

        Ok(board)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
