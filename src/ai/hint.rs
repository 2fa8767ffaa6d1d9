//! Plain-language hints for a human player.
//!
//! Reads the board through the same vocabulary the AI ladder scores with
//! (capture value, centre control, loose pieces, check) and never mutates it.

use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::rules::RuleEngine;
use crate::engine::types::{Color, PieceKind};

use super::evaluation::{center_score, is_loose, lands_loose};

/// At most this many loose-piece warnings are reported.
const MAX_THREAT_HINTS: usize = 3;

/// Suggestions for `color` as the side to move, most urgent first.
///
/// Always returns at least one line. A side with nothing to play gets a
/// single line starting with "No legal moves".
pub fn hints(board: &Board, color: Color) -> Vec<String> {
    let rules = RuleEngine::new(board);
    let moves = rules.legal_moves(color);
    let in_check = rules.is_king_in_check(color);

    if moves.is_empty() {
        let outcome = if in_check { "checkmate" } else { "stalemate" };
        return vec![format!("No legal moves: {outcome}.")];
    }

    let mut hints = Vec::new();

    if in_check {
        let king = board
            .find_king(color)
            .map(|at| format!(" on {}", at.to_algebraic()))
            .unwrap_or_default();
        hints.push(format!(
            "Your king{king} is in check; only {} move(s) get out of it.",
            moves.len()
        ));
    }

    if let Some(mv) = best_safe_capture(board, &moves)
        && let Some(victim) = mv.captured_piece()
    {
        hints.push(format!(
            "Capture the {} on {} with your {} ({mv}).",
            victim.kind(),
            mv.to().to_algebraic(),
            mv.moved_piece().kind(),
        ));
    }

    let mut threatened: Vec<_> = board
        .pieces_of(color)
        .filter(|p| p.kind() != PieceKind::King && is_loose(board, p.position()))
        .collect();
    threatened.sort_by_key(|p| std::cmp::Reverse(p.value()));
    for piece in threatened.into_iter().take(MAX_THREAT_HINTS) {
        hints.push(format!(
            "Your {} on {} is attacked and not safely defended.",
            piece.kind(),
            piece.position().to_algebraic(),
        ));
    }

    if !in_check && let Some(mv) = centralising_move(board, &moves) {
        hints.push(format!("Consider {mv} to strengthen your hold on the centre."));
    }

    if hints.is_empty() {
        hints.push(format!(
            "No immediate tactics; {} legal moves are available.",
            moves.len()
        ));
    }
    hints
}

/// Capture with the best net gain, counting the mover as lost if it lands
/// loose. Only strictly profitable captures qualify.
fn best_safe_capture<'m>(board: &Board, moves: &'m [Move]) -> Option<&'m Move> {
    let mut best: Option<(&Move, i32)> = None;
    for mv in moves.iter().filter(|m| m.is_capture()) {
        let risk = if lands_loose(board, mv) {
            mv.moved_piece().value()
        } else {
            0
        };
        let gain = mv.captured_value() - risk;
        if gain > 0 && best.is_none_or(|(_, top)| gain > top) {
            best = Some((mv, gain));
        }
    }
    best.map(|(mv, _)| mv)
}

/// Quiet, safe move that brings a minor piece or pawn closer to the centre.
fn centralising_move<'m>(board: &Board, moves: &'m [Move]) -> Option<&'m Move> {
    let mut best: Option<(&Move, i32)> = None;
    for mv in moves {
        let kind = mv.moved_piece().kind();
        if mv.is_capture()
            || !matches!(kind, PieceKind::Pawn | PieceKind::Knight | PieceKind::Bishop)
        {
            continue;
        }
        let gain = center_score(mv.to()) - center_score(mv.from());
        if gain > 0 && !lands_loose(board, mv) && best.is_none_or(|(_, top)| gain > top) {
            best = Some((mv, gain));
        }
    }
    best.map(|(mv, _)| mv)
}

// =========================================================================
// Tests
// =========================================================================
