//! Players: the turn-taking interface and its human and computer sides.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::rules::RuleEngine;
use crate::engine::types::Color;

use super::strategy::Strategy;

// =========================================================================
// Player trait
// =========================================================================

/// One side of a game, called polymorphically by the orchestrator each turn.
pub trait Player: Send + Sync {
    fn name(&self) -> &str;

    fn color(&self) -> Color;

    fn is_human(&self) -> bool;

    /// Pick a move for this player's colour. `None` means there is nothing
    /// to play from this side; for a computer player that is a terminal
    /// position.
    fn make_move(&mut self, board: &Board) -> Option<Move>;

    /// Difficulty level for computer players.
    fn ai_level(&self) -> Option<i32> {
        None
    }
}

// =========================================================================
// HumanPlayer
// =========================================================================

/// A human side. Its moves arrive from outside (the API or a UI), so
/// [`Player::make_move`] has nothing to offer.
#[derive(Clone, Debug)]
pub struct HumanPlayer {
    name: String,
    color: Color,
}

impl HumanPlayer {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

impl Player for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Color {
        self.color
    }

    fn is_human(&self) -> bool {
        true
    }

    fn make_move(&mut self, _board: &Board) -> Option<Move> {
        None
    }
}

// =========================================================================
// AiPlayer
// =========================================================================

/// Computer opponent whose strength is a rung of the [`Strategy`] ladder.
///
/// The level is stored as given; values outside 1..=10 are clamped only when
/// the strategy is looked up.
#[derive(Debug)]
pub struct AiPlayer {
    name: String,
    color: Color,
    level: i32,
    rng: StdRng,
}

impl AiPlayer {
    pub fn new(name: impl Into<String>, color: Color, level: i32) -> Self {
        Self::with_rng(name, color, level, StdRng::from_entropy())
    }

    /// Reproducible player for tests and replays.
    pub fn with_seed(name: impl Into<String>, color: Color, level: i32, seed: u64) -> Self {
        Self::with_rng(name, color, level, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, color: Color, level: i32, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            color,
            level,
            rng,
        }
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn set_level(&mut self, level: i32) {
        self.level = level;
    }

    /// The ladder rung this player's level selects.
    #[inline]
    pub fn strategy(&self) -> Strategy {
        Strategy::for_level(self.level)
    }

    pub(super) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Every legal move for this player's colour. Empty when the position is
    /// terminal for this side.
    pub fn generate_valid_moves(&self, board: &Board) -> Vec<Move> {
        RuleEngine::new(board).legal_moves(self.color)
    }

    /// The opposing colour.
    #[inline]
    pub fn switch_color(color: Color) -> Color {
        !color
    }

    /// Colour of the side this player plays against.
    #[inline]
    pub fn opponent(&self) -> Color {
        Self::switch_color(self.color)
    }
}

impl Player for AiPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Color {
        self.color
    }

    fn is_human(&self) -> bool {
        false
    }

    fn make_move(&mut self, board: &Board) -> Option<Move> {
        let moves = self.generate_valid_moves(board);
        if moves.is_empty() {
            debug!(color = %self.color, "no legal moves");
            return None;
        }

        let strategy = self.strategy();
        let chosen = self
            .select(strategy, board, &moves)
            .or_else(|| self.generate_random_move(&moves));
        if let Some(mv) = &chosen {
            debug!(
                color = %self.color,
                level = self.level,
                %strategy,
                candidates = moves.len(),
                %mv,
                "ai move selected"
            );
        }
        chosen
    }

    fn ai_level(&self) -> Option<i32> {
        Some(self.level)
    }
}

// =========================================================================
// Tests
// =========================================================================
