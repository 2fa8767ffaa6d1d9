use std::fmt;

// ---------------------------------------------------------------------------
// Board dimensions
// ---------------------------------------------------------------------------

/// Number of rows on the board.
pub const ROWS: usize = 8;
/// Number of columns on the board.
pub const COLUMNS: usize = 8;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Row delta a pawn of this colour advances by. White starts on row 6
    /// and walks toward row 0.
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this colour's king and rooks at the start.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row holding this colour's pawns at the start.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row on which this colour's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Parse "white"/"black" (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "white" | "w" => Some(Color::White),
            "black" | "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds. The set is closed by the rules of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Material weight. The king's value is a sentinel for evaluation.
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 1000,
        }
    }

    /// One-letter code, always uppercase.
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        match color {
            Color::White => self.symbol(),
            Color::Black => self.symbol().to_ascii_lowercase(),
        }
    }

    /// Parse a FEN piece character; case selects the colour.
    pub fn from_char(c: char) -> Option<(Color, PieceKind)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((color, kind))
    }

    /// Parse a promotion code ("q", "N", "queen", ...). Only Q/R/B/N qualify.
    pub fn promotion_from_str(s: &str) -> Option<PieceKind> {
        match s.to_lowercase().as_str() {
            "q" | "queen" => Some(PieceKind::Queen),
            "r" | "rook" => Some(PieceKind::Rook),
            "b" | "bishop" => Some(PieceKind::Bishop),
            "n" | "knight" => Some(PieceKind::Knight),
            _ => None,
        }
    }

    /// Whether a pawn may promote into this kind.
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// An on-board grid position. Row 0 is Black's back rank (rank 8),
/// column 0 is the a-file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    row: u8,
    col: u8,
}

impl Coordinate {
    /// Build a coordinate from in-range indices.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not below 8.
    pub fn new(row: u8, col: u8) -> Self {
        assert!(
            (row as usize) < ROWS && (col as usize) < COLUMNS,
            "coordinate out of range: ({row},{col})"
        );
        Coordinate { row, col }
    }

    /// Bounds-checked construction from signed indices.
    #[inline]
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if (0..ROWS as i32).contains(&row) && (0..COLUMNS as i32).contains(&col) {
            Some(Coordinate {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.col
    }

    /// The coordinate shifted by a delta, if still on the board.
    #[inline]
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Self::checked(self.row as i32 + d_row, self.col as i32 + d_col)
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Coordinate {
                row: 7 - rank,
                col: file,
            })
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.col) as char;
        let rank = (b'8' - self.row) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Status of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine.
///
/// Ordinary outcomes such as "no legal move" are not errors; they surface as
/// empty vectors, `None`, or a terminal [`GameStatus`].
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid move: {from} -> {to}: {reason}")]
    InvalidMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid saved game: {0}")]
    InvalidPgn(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("it is {0}'s turn")]
    NotYourTurn(Color),

    #[error("inconsistent move: {0}")]
    InconsistentMove(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_rows() {
        assert_eq!(Color::White.home_row(), 7);
        assert_eq!(Color::Black.pawn_row(), 1);
        assert_eq!(Color::White.promotion_row(), 0);
        assert_eq!(Color::White.forward(), -1);
    }

    #[test]
    fn piece_values() {
        assert_eq!(PieceKind::Pawn.value(), 1);
        assert_eq!(PieceKind::Knight.value(), 3);
        assert_eq!(PieceKind::Bishop.value(), 3);
        assert_eq!(PieceKind::Rook.value(), 5);
        assert_eq!(PieceKind::Queen.value(), 9);
        assert_eq!(PieceKind::King.value(), 1000);
    }

    #[test]
    fn piece_char_round_trip() {
        for kind in PieceKind::ALL {
            let wc = kind.to_char(Color::White);
            let bc = kind.to_char(Color::Black);
            assert_eq!(PieceKind::from_char(wc), Some((Color::White, kind)));
            assert_eq!(PieceKind::from_char(bc), Some((Color::Black, kind)));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn promotion_codes() {
        assert_eq!(PieceKind::promotion_from_str("Q"), Some(PieceKind::Queen));
        assert_eq!(PieceKind::promotion_from_str("knight"), Some(PieceKind::Knight));
        assert_eq!(PieceKind::promotion_from_str("k"), None);
        assert!(!PieceKind::King.is_promotion_target());
        assert!(!PieceKind::Pawn.is_promotion_target());
    }

    #[test]
    fn coordinate_display() {
        assert_eq!(Coordinate::new(3, 4).to_string(), "(3,4)");
    }

    #[test]
    fn coordinate_checked_bounds() {
        assert!(Coordinate::checked(0, 0).is_some());
        assert!(Coordinate::checked(7, 7).is_some());
        assert!(Coordinate::checked(-1, 0).is_none());
        assert!(Coordinate::checked(0, 8).is_none());
        assert!(Coordinate::checked(8, 3).is_none());
    }

    #[test]
    fn coordinate_algebraic() {
        assert_eq!(Coordinate::from_algebraic("a8"), Some(Coordinate::new(0, 0)));
        assert_eq!(Coordinate::from_algebraic("h1"), Some(Coordinate::new(7, 7)));
        assert_eq!(Coordinate::from_algebraic("e2"), Some(Coordinate::new(6, 4)));
        assert_eq!(Coordinate::new(6, 4).to_algebraic(), "e2");
        assert_eq!(Coordinate::from_algebraic("i1"), None);
        assert_eq!(Coordinate::from_algebraic("a9"), None);
        assert_eq!(Coordinate::from_algebraic(""), None);
    }

    #[test]
    #[should_panic]
    fn coordinate_new_rejects_out_of_range() {
        let _ = Coordinate::new(8, 0);
    }

    #[test]
    fn game_status_strings() {
        assert_eq!(GameStatus::Active.as_str(), "active");
        assert_eq!(GameStatus::Checkmate.to_string(), "checkmate");
        assert!(GameStatus::Stalemate.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
    }
}
