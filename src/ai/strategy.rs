//! The difficulty ladder.
//!
//! Each rung is a move-selection heuristic over a list of legal moves. The
//! level a player is created with maps onto a rung through
//! [`Strategy::for_level`]; levels outside 1..=10 clamp to the nearest end.
//!
//! Every strategy returns `Some` whenever the list it is handed is non-empty.
//! Ties between equally scored moves go to the earliest move in the list.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::rules::RuleEngine;

use super::evaluation::{
    MATE_BONUS, center_score, defensive_score, lands_loose, material_balance, simulate,
};
use super::player::AiPlayer;

/// Chance that the beginner tier takes a capture when one is on offer.
const BEGINNER_CAPTURE_RATE: f64 = 0.75;

const HARDEST_CAPTURE_WEIGHT: i32 = 3;
const HARDEST_CHECK_BONUS: i32 = 6;
const HARDEST_STALEMATE_PENALTY: i32 = 50;

// =========================================================================
// Strategy
// =========================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Random,
    CaptureAny,
    CaptureHighValue,
    VeryBeginner,
    AvoidLoosePiece,
    PopulateCenter,
    OneStepLookahead,
    DefensiveLookahead,
    CheckGiving,
    Hardest,
}

impl Strategy {
    /// Weakest first; index + 1 is the difficulty level.
    pub const LADDER: [Strategy; 10] = [
        Strategy::Random,
        Strategy::CaptureAny,
        Strategy::CaptureHighValue,
        Strategy::VeryBeginner,
        Strategy::AvoidLoosePiece,
        Strategy::PopulateCenter,
        Strategy::OneStepLookahead,
        Strategy::DefensiveLookahead,
        Strategy::CheckGiving,
        Strategy::Hardest,
    ];

    pub const MIN_LEVEL: i32 = 1;
    pub const MAX_LEVEL: i32 = Self::LADDER.len() as i32;

    /// Strategy for a difficulty level. Never fails: out-of-range levels are
    /// clamped.
    pub fn for_level(level: i32) -> Self {
        let level = level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL);
        Self::LADDER[(level - 1) as usize]
    }

    /// The difficulty level this strategy sits at.
    pub fn level(self) -> i32 {
        Self::LADDER
            .iter()
            .position(|&s| s == self)
            .map_or(Self::MIN_LEVEL, |i| i as i32 + 1)
    }

    /// The rung below, or `self` at the bottom.
    pub fn weaker(self) -> Self {
        Self::for_level(self.level() - 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::CaptureAny => "capture-any",
            Strategy::CaptureHighValue => "capture-high-value",
            Strategy::VeryBeginner => "very-beginner",
            Strategy::AvoidLoosePiece => "avoid-loose-piece",
            Strategy::PopulateCenter => "populate-center",
            Strategy::OneStepLookahead => "one-step-lookahead",
            Strategy::DefensiveLookahead => "defensive-lookahead",
            Strategy::CheckGiving => "check-giving",
            Strategy::Hardest => "hardest",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First move with the highest score.
fn best_by<F>(moves: &[Move], mut score: F) -> Option<&Move>
where
    F: FnMut(&Move) -> i32,
{
    let mut best: Option<(&Move, i32)> = None;
    for mv in moves {
        let s = score(mv);
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((mv, s));
        }
    }
    best.map(|(mv, _)| mv)
}

fn captures(moves: &[Move]) -> Vec<Move> {
    moves.iter().filter(|m| m.is_capture()).cloned().collect()
}

// =========================================================================
// Ladder rungs
// =========================================================================

impl AiPlayer {
    /// Run one rung of the ladder over `moves`.
    pub fn select(&mut self, strategy: Strategy, board: &Board, moves: &[Move]) -> Option<Move> {
        match strategy {
            Strategy::Random => self.generate_random_move(moves),
            Strategy::CaptureAny => self.capture_any_piece(moves),
            Strategy::CaptureHighValue => self.capture_high_value_piece(moves),
            Strategy::VeryBeginner => self.very_beginner_play(moves),
            Strategy::AvoidLoosePiece => self.avoid_move_to_loose_piece(board, moves),
            Strategy::PopulateCenter => self.populate_board_center(moves),
            Strategy::OneStepLookahead => self.look_one_step_forward(board, moves),
            Strategy::DefensiveLookahead => self.one_step_ahead_defensive_play(board, moves),
            Strategy::CheckGiving => self.check_giving_moves(board, moves),
            Strategy::Hardest => self.hardest_ai_move(board, moves),
        }
    }

    /// Uniform choice.
    pub fn generate_random_move(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(self.rng()).cloned()
    }

    /// Any capture at random, else any move at random.
    pub fn capture_any_piece(&mut self, moves: &[Move]) -> Option<Move> {
        let captures = captures(moves);
        if captures.is_empty() {
            return self.generate_random_move(moves);
        }
        self.generate_random_move(&captures)
    }

    /// The capture that takes the most material. Random when nothing can be
    /// taken.
    pub fn capture_high_value_piece(&mut self, moves: &[Move]) -> Option<Move> {
        let captures = captures(moves);
        match best_by(&captures, Move::captured_value) {
            Some(mv) => Some(mv.clone()),
            None => self.generate_random_move(moves),
        }
    }

    /// Usually grabs material when it can; otherwise plays anything.
    pub fn very_beginner_play(&mut self, moves: &[Move]) -> Option<Move> {
        let captures = captures(moves);
        if !captures.is_empty() && self.rng().gen_bool(BEGINNER_CAPTURE_RATE) {
            return self.generate_random_move(&captures);
        }
        self.generate_random_move(moves)
    }

    /// Drop moves that leave the moved piece hanging on its landing square,
    /// then take the best capture among the rest. When every move hangs the
    /// piece, any move will do.
    pub fn avoid_move_to_loose_piece(&mut self, board: &Board, moves: &[Move]) -> Option<Move> {
        let safe: Vec<Move> = moves
            .iter()
            .filter(|m| !lands_loose(board, m))
            .cloned()
            .collect();
        if safe.is_empty() {
            return self.generate_random_move(moves);
        }
        self.capture_high_value_piece(&safe)
    }

    /// Move closest to the four central squares.
    pub fn populate_board_center(&mut self, moves: &[Move]) -> Option<Move> {
        best_by(moves, |m| center_score(m.to())).cloned()
    }

    /// Best material balance one ply ahead.
    pub fn look_one_step_forward(&mut self, board: &Board, moves: &[Move]) -> Option<Move> {
        best_by(moves, |m| {
            material_balance(&simulate(board, m), m.moved_piece().color())
        })
        .cloned()
    }

    /// One ply ahead, trading material gain against pieces left en prise.
    pub fn one_step_ahead_defensive_play(
        &mut self,
        board: &Board,
        moves: &[Move],
    ) -> Option<Move> {
        best_by(moves, |m| defensive_score(board, m)).cloned()
    }

    /// Mate if possible, else the soundest check, else defensive play.
    pub fn check_giving_moves(&mut self, board: &Board, moves: &[Move]) -> Option<Move> {
        let mut checks = Vec::new();
        for mv in moves {
            let next = simulate(board, mv);
            let rules = RuleEngine::new(&next);
            let opponent = !mv.moved_piece().color();
            if rules.is_king_in_check(opponent) {
                if !rules.has_legal_move(opponent) {
                    return Some(mv.clone());
                }
                checks.push(mv.clone());
            }
        }
        if checks.is_empty() {
            return self.select(Strategy::CheckGiving.weaker(), board, moves);
        }
        best_by(&checks, |m| defensive_score(board, m)).cloned()
    }

    /// Composite score over every admissible move: defensive lookahead,
    /// weighted capture value and a check bonus. Mate outranks everything and
    /// stalemating the opponent is penalised.
    pub fn hardest_ai_move(&mut self, board: &Board, moves: &[Move]) -> Option<Move> {
        let rules = RuleEngine::new(board);
        let admissible: Vec<Move> = moves
            .iter()
            .filter(|m| rules.is_move_legal(m))
            .cloned()
            .collect();
        if admissible.is_empty() {
            return self.generate_random_move(moves);
        }

        best_by(&admissible, |mv| {
            let next = simulate(board, mv);
            let after = RuleEngine::new(&next);
            let opponent = !mv.moved_piece().color();
            let mut score =
                defensive_score(board, mv) + HARDEST_CAPTURE_WEIGHT * mv.captured_value();
            match (after.is_king_in_check(opponent), after.has_legal_move(opponent)) {
                (true, false) => score += MATE_BONUS,
                (true, true) => score += HARDEST_CHECK_BONUS,
                (false, false) => score -= HARDEST_STALEMATE_PENALTY,
                (false, true) => {}
            }
            score
        })
        .cloned()
        .inspect(|mv| debug!(%mv, "hardest tier picked"))
    }
}

// =========================================================================
// Tests
// =========================================================================
