use serde::{Deserialize, Serialize};

use crate::engine::game::{Game, SessionInfo};
use crate::engine::moves::Move;
use crate::engine::piece::Piece;
use crate::engine::types::{Color, GameStatus};

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// "human-vs-human" or "human-vs-ai" (the default).
    pub mode: Option<String>,
    pub ai_level: Option<i32>,
    pub white_is_human: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesQuery {
    pub from: Option<String>,
}

/// Exactly one of the two fields must be set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Saved-game text as produced by the export endpoint.
    pub pgn: Option<String>,
    /// Id of a game previously written to the save directory.
    pub saved: Option<String>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub board: Vec<Vec<Option<String>>>,
    pub status: String,
    pub current_player: String,
    pub check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub move_history: Vec<MoveEntry>,
    pub captured_pieces: CapturedPieces,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<MoveEntry>,
    pub players: Players,
    pub session: SessionInfo,
    pub created_at: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntry {
    pub from: String,
    pub to: String,
    pub piece: PieceInfo,
    pub captured: Option<PieceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    pub castling: bool,
    /// Coordinate notation, e.g. "e2e4" or "e7e8=Q".
    pub notation: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PieceInfo {
    #[serde(rename = "type")]
    pub piece_type: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPieces {
    /// White pieces taken by Black.
    pub white: Vec<String>,
    /// Black pieces taken by White.
    pub black: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Players {
    pub white: PlayerInfo,
    pub black: PlayerInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub name: String,
    pub human: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_level: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMoveEntry {
    pub from: String,
    pub to: String,
    pub notation: String,
    pub capture: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesResponse {
    pub moves: Vec<LegalMoveEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMoveResponse {
    /// Absent when the computer had no legal move.
    #[serde(rename = "move")]
    pub ai_move: Option<MoveEntry>,
    pub strategy: String,
    #[serde(flatten)]
    pub game: GameResponse,
    pub thinking_time: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub id: String,
    pub saved: bool,
    pub plies: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintResponse {
    pub side: String,
    pub hints: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn color_name(c: Color) -> &'static str {
    match c {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn piece_info(piece: &Piece) -> PieceInfo {
    PieceInfo {
        piece_type: piece.kind().to_string(),
        color: color_name(piece.color()).to_string(),
    }
}

/// Build the 8×8 board array for the API response.
/// Row 0 = rank 8 (top), row 7 = rank 1 (bottom).
/// Pieces: uppercase for White ("R"), lowercase for Black ("r").
/// Empty = None.
pub fn board_to_api(game: &Game) -> Vec<Vec<Option<String>>> {
    game.board()
        .squares()
        .iter()
        .map(|row| {
            row.iter()
                .map(|sq| sq.piece().map(|p| p.kind().to_char(p.color()).to_string()))
                .collect()
        })
        .collect()
}

/// Pieces removed from the board, read off the recorded captures.
pub fn captured_pieces(game: &Game) -> CapturedPieces {
    let mut captured = CapturedPieces {
        white: Vec::new(),
        black: Vec::new(),
    };
    for victim in game.history().iter().filter_map(Move::captured_piece) {
        let symbol = victim.kind().to_char(victim.color()).to_string();
        match victim.color() {
            Color::White => captured.white.push(symbol),
            Color::Black => captured.black.push(symbol),
        }
    }
    captured
}

pub fn move_entry(mv: &Move) -> MoveEntry {
    MoveEntry {
        from: mv.from().to_algebraic(),
        to: mv.to().to_algebraic(),
        piece: piece_info(mv.moved_piece()),
        captured: mv.captured_piece().map(piece_info),
        promotion: mv.promotion().map(|k| k.to_string()),
        castling: mv.is_castling(),
        notation: mv.to_string(),
    }
}

pub fn legal_move_entry(mv: &Move) -> LegalMoveEntry {
    LegalMoveEntry {
        from: mv.from().to_algebraic(),
        to: mv.to().to_algebraic(),
        notation: mv.to_string(),
        capture: mv.is_capture(),
        promotion: mv.promotion().map(|k| k.to_string()),
    }
}

fn player_info(game: &Game, color: Color) -> PlayerInfo {
    let player = game.player(color);
    PlayerInfo {
        name: player.name().to_string(),
        human: player.is_human(),
        ai_level: player.ai_level(),
    }
}

/// Convert internal Game to full API GameResponse.
pub fn game_to_response(game: &Game) -> GameResponse {
    let status = game.status();
    GameResponse {
        id: game.id().to_string(),
        board: board_to_api(game),
        status: status.as_str().to_string(),
        current_player: color_name(game.side_to_move()).to_string(),
        check: matches!(status, GameStatus::Check | GameStatus::Checkmate),
        winner: game.winner().map(|c| color_name(c).to_string()),
        move_history: game.history().iter().map(move_entry).collect(),
        captured_pieces: captured_pieces(game),
        last_move: game.last_move().map(move_entry),
        players: Players {
            white: player_info(game, Color::White),
            black: player_info(game, Color::Black),
        },
        session: game.session().clone(),
        created_at: game.created_at().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Coordinate;

    fn c(name: &str) -> Coordinate {
        Coordinate::from_algebraic(name).unwrap()
    }

    #[test]
    fn board_layout_rank_eight_first() {
        let game = Game::human_vs_human();
        let board = board_to_api(&game);
        assert_eq!(board.len(), 8);
        assert_eq!(board[0][4].as_deref(), Some("k"));
        assert_eq!(board[7][3].as_deref(), Some("Q"));
        assert_eq!(board[4][4], None);
    }

    #[test]
    fn captures_are_listed_by_victim_colour() {
        let mut game = Game::human_vs_human();
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("d8", "d5")] {
            game.play(c(from), c(to), None).unwrap();
        }
        let captured = captured_pieces(&game);
        assert_eq!(captured.white, vec!["P"]);
        assert_eq!(captured.black, vec!["p"]);
    }

    #[test]
    fn response_serializes_camel_case() {
        let mut game = Game::human_vs_human();
        game.play(c("e2"), c("e4"), None).unwrap();
        let json = serde_json::to_value(game_to_response(&game)).unwrap();
        assert_eq!(json["currentPlayer"], "black");
        assert_eq!(json["lastMove"]["notation"], "e2e4");
        assert_eq!(json["lastMove"]["piece"]["type"], "pawn");
        assert_eq!(json["session"]["whiteIsHuman"], true);
        assert_eq!(json["players"]["white"]["human"], true);
        assert!(json.get("winner").is_none());
    }
}
