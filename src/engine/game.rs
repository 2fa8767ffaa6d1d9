//! Turn orchestration.
//!
//! `Game` owns the live board and both players, applies one move per turn
//! and recomputes the status for the side to move after every ply. It is
//! the type the API layer and persistence work with.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::player::{AiPlayer, HumanPlayer, Player};
use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::pgn::{self, SavedGame};
use crate::engine::rules::RuleEngine;
use crate::engine::types::{ChessError, Color, Coordinate, GameStatus, PieceKind};

// =========================================================================
// SessionInfo
// =========================================================================

/// Metadata stored alongside the moves of a saved game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Free-text label such as "Human vs AI".
    pub mode: String,
    /// Difficulty of the computer side; 0 when nobody is a computer.
    pub ai_level: i32,
    pub white_is_human: bool,
}

impl SessionInfo {
    pub const HUMAN_VS_HUMAN: &'static str = "Human vs Human";
    pub const HUMAN_VS_AI: &'static str = "Human vs AI";

    /// Does the mode label name a computer opponent ("AI" as a word)?
    pub fn has_ai(&self) -> bool {
        self.mode
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word.eq_ignore_ascii_case("ai"))
    }
}

// =========================================================================
// Game
// =========================================================================

pub struct Game {
    id: String,
    created_at: DateTime<Utc>,
    board: Board,
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    side_to_move: Color,
    history: Vec<Move>,
    session: SessionInfo,
    status: GameStatus,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Fresh game from the starting position with the given players.
    pub fn with_players(
        white: Box<dyn Player>,
        black: Box<dyn Player>,
        session: SessionInfo,
    ) -> Self {
        let game = Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            board: Board::starting(),
            white,
            black,
            side_to_move: Color::White,
            history: Vec::new(),
            session,
            status: GameStatus::Active,
        };
        info!(id = %game.id, mode = %game.session.mode, "game created");
        game
    }

    pub fn human_vs_human() -> Self {
        Self::with_players(
            Box::new(HumanPlayer::new("White", Color::White)),
            Box::new(HumanPlayer::new("Black", Color::Black)),
            SessionInfo {
                mode: SessionInfo::HUMAN_VS_HUMAN.into(),
                ai_level: 0,
                white_is_human: true,
            },
        )
    }

    /// Human against the computer at `level` (clamped when the strategy is
    /// chosen, stored as given).
    pub fn human_vs_ai(level: i32, white_is_human: bool) -> Self {
        let (white, black) = Self::seat_players(level, white_is_human);
        Self::with_players(
            white,
            black,
            SessionInfo {
                mode: SessionInfo::HUMAN_VS_AI.into(),
                ai_level: level,
                white_is_human,
            },
        )
    }

    fn seat_players(level: i32, white_is_human: bool) -> (Box<dyn Player>, Box<dyn Player>) {
        let seat = |color: Color| -> Box<dyn Player> {
            if white_is_human == (color == Color::White) {
                Box::new(HumanPlayer::new("Player", color))
            } else {
                Box::new(AiPlayer::new("Computer", color, level))
            }
        };
        (seat(Color::White), seat(Color::Black))
    }

    /// Rebuild a live game from a replayed save.
    pub fn from_saved(saved: SavedGame) -> Self {
        let (white, black): (Box<dyn Player>, Box<dyn Player>) = if saved.session.has_ai() {
            Self::seat_players(saved.session.ai_level, saved.session.white_is_human)
        } else {
            (
                Box::new(HumanPlayer::new("White", Color::White)),
                Box::new(HumanPlayer::new("Black", Color::Black)),
            )
        };
        let side_to_move = saved.side_to_move();
        let status = RuleEngine::new(&saved.board).status(side_to_move);
        let game = Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            board: saved.board,
            white,
            black,
            side_to_move,
            history: saved.moves,
            session: saved.session,
            status,
        };
        info!(id = %game.id, plies = game.history.len(), status = %game.status.as_str(), "game restored");
        game
    }

    /// Parse saved-game text into a live game.
    pub fn from_pgn(text: &str) -> Result<Self, ChessError> {
        pgn::parse(text).map(Self::from_saved)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// The side that delivered mate, if the game ended that way.
    pub fn winner(&self) -> Option<Color> {
        (self.status == GameStatus::Checkmate).then_some(!self.side_to_move)
    }

    pub fn player(&self, color: Color) -> &dyn Player {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    /// Is the side to move driven by the computer?
    pub fn is_ai_turn(&self) -> bool {
        !self.player(self.side_to_move).is_human()
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        RuleEngine::new(&self.board).legal_moves(self.side_to_move)
    }

    /// Legal destinations from `from` for the side to move. Empty when the
    /// square holds no piece of that side.
    pub fn legal_destinations(&self, from: Coordinate) -> Vec<Coordinate> {
        match self.board.piece_at(from) {
            Some(p) if p.color() == self.side_to_move => {
                RuleEngine::new(&self.board).legal_destinations(from)
            }
            _ => Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------

    /// Submit a move for the human whose turn it is.
    pub fn play(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        promotion: Option<PieceKind>,
    ) -> Result<&Move, ChessError> {
        self.ensure_running()?;
        if self.is_ai_turn() {
            return Err(ChessError::InvalidMove {
                from: from.to_algebraic(),
                to: to.to_algebraic(),
                reason: format!("{} is played by the computer", self.side_to_move),
            });
        }

        let mv = RuleEngine::new(&self.board)
            .resolve_move(self.side_to_move, from, to, promotion)
            .inspect_err(|e| warn!(id = %self.id, error = %e, "move rejected"))?;
        self.commit(mv)
    }

    /// Let the computer play if it is its turn. `Ok(None)` means it had no
    /// legal move; the status tells checkmate from stalemate.
    pub fn play_ai_turn(&mut self) -> Result<Option<Move>, ChessError> {
        self.ensure_running()?;
        let side = self.side_to_move;
        let player = match side {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        if player.is_human() {
            return Err(ChessError::NotYourTurn(side));
        }

        match player.make_move(&self.board) {
            Some(mv) => {
                let legal = RuleEngine::new(&self.board)
                    .legal_moves(side)
                    .iter()
                    .any(|m| m.same_action(&mv));
                if !legal {
                    warn!(id = %self.id, %mv, "computer proposed an illegal move");
                    return Err(ChessError::InconsistentMove(format!(
                        "{side} proposed {mv}, which is not legal here"
                    )));
                }
                self.commit(mv).map(|mv| Some(mv.clone()))
            }
            None => {
                self.status = RuleEngine::new(&self.board).status(side);
                info!(id = %self.id, status = %self.status.as_str(), "computer has no move");
                Ok(None)
            }
        }
    }

    fn ensure_running(&self) -> Result<(), ChessError> {
        if self.is_game_over() {
            return Err(ChessError::GameOver(self.status.as_str().to_string()));
        }
        Ok(())
    }

    /// Apply a legal move, hand the turn over and refresh the status. The
    /// game is left as it was when the board refuses the move.
    fn commit(&mut self, mv: Move) -> Result<&Move, ChessError> {
        if !self.board.apply_move(&mv) {
            return Err(ChessError::InconsistentMove(format!(
                "{mv} could not be applied to the board"
            )));
        }
        self.side_to_move = !self.side_to_move;
        self.status = RuleEngine::new(&self.board).status(self.side_to_move);
        debug!(id = %self.id, %mv, status = %self.status.as_str(), "move applied");
        if self.status.is_game_over() {
            info!(
                id = %self.id,
                status = %self.status.as_str(),
                plies = self.history.len() + 1,
                "game finished"
            );
        }
        self.history.push(mv);
        Ok(&self.history[self.history.len() - 1])
    }

    // -----------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------

    pub fn to_pgn(&self) -> String {
        pgn::to_pgn(&self.history, &self.session, self.status)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ChessError> {
        pgn::save(path, &self.history, &self.session, self.status)
    }

    /// `None` for a missing or corrupt file.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        pgn::load(path).map(Self::from_saved)
    }
}

// =========================================================================
// Tests
// =========================================================================
