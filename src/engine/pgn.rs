//! Saved games in a PGN-style text format.
//!
//! Tag pairs carry the session metadata; the movetext lists moves in
//! coordinate notation (`e2e4`, promotions as `e7e8=Q`) with move numbers:
//!
//! ```text
//! [Event "Casual Game"]
//! [Site "tiered-chess"]
//! [Date "2024.05.01"]
//! [Mode "Human vs AI"]
//! [AiLevel "5"]
//! [WhiteIsHuman "true"]
//! [Result "*"]
//!
//! 1. e2e4 e7e5 2. g1f3 *
//! ```
//!
//! Loading replays every move from the starting position through the rule
//! engine. Any bad tag value or illegal move rejects the whole file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::engine::board::Board;
use crate::engine::game::SessionInfo;
use crate::engine::moves::Move;
use crate::engine::rules::RuleEngine;
use crate::engine::types::{ChessError, Color, Coordinate, GameStatus, PieceKind};

const MAX_LINE: usize = 80;
const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A game read back from disk, positioned after its last move.
#[derive(Clone, Debug)]
pub struct SavedGame {
    pub session: SessionInfo,
    pub date: Option<NaiveDate>,
    pub moves: Vec<Move>,
    pub board: Board,
}

impl SavedGame {
    /// Side to move after the replayed moves. White always opens.
    pub fn side_to_move(&self) -> Color {
        side_after(self.moves.len())
    }
}

fn side_after(plies: usize) -> Color {
    if plies % 2 == 0 {
        Color::White
    } else {
        Color::Black
    }
}

// =========================================================================
// Writing
// =========================================================================

/// PGN result token. On checkmate the side to move has lost.
pub fn result_token(status: GameStatus, side_to_move: Color) -> &'static str {
    match status {
        GameStatus::Checkmate => match side_to_move {
            Color::White => "0-1",
            Color::Black => "1-0",
        },
        GameStatus::Stalemate => "1/2-1/2",
        GameStatus::Active | GameStatus::Check => "*",
    }
}

/// Render a game as text.
pub fn to_pgn(moves: &[Move], session: &SessionInfo, status: GameStatus) -> String {
    let result = result_token(status, side_after(moves.len()));
    let date = Utc::now().format("%Y.%m.%d").to_string();

    let mut pgn = String::with_capacity(256 + moves.len() * 8);
    push_tag(&mut pgn, "Event", "Casual Game");
    push_tag(&mut pgn, "Site", "tiered-chess");
    push_tag(&mut pgn, "Date", &date);
    push_tag(&mut pgn, "Mode", &session.mode);
    push_tag(&mut pgn, "AiLevel", &session.ai_level.to_string());
    push_tag(&mut pgn, "WhiteIsHuman", &session.white_is_human.to_string());
    push_tag(&mut pgn, "Result", result);
    pgn.push('\n');

    let mut line = String::new();
    let tokens = moves
        .iter()
        .enumerate()
        .map(|(i, mv)| {
            if i % 2 == 0 {
                format!("{}. {mv}", i / 2 + 1)
            } else {
                mv.to_string()
            }
        })
        .chain(std::iter::once(result.to_string()));

    for token in tokens {
        if !line.is_empty() && line.len() + token.len() + 1 > MAX_LINE {
            pgn.push_str(&line);
            pgn.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    pgn.push_str(&line);
    pgn.push('\n');
    pgn
}

fn push_tag(out: &mut String, name: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{name} \"{escaped}\"]\n"));
}

/// Write a game to `path`, creating parent directories as needed.
pub fn save(
    path: impl AsRef<Path>,
    moves: &[Move],
    session: &SessionInfo,
    status: GameStatus,
) -> Result<(), ChessError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_pgn(moves, session, status))?;
    info!(path = %path.display(), plies = moves.len(), "game saved");
    Ok(())
}

// =========================================================================
// Reading
// =========================================================================

/// Read a saved game. `None` when the file is missing or does not hold a
/// fully valid game; the reason is logged.
pub fn load(path: impl AsRef<Path>) -> Option<SavedGame> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read saved game");
            return None;
        }
    };
    match parse(&text) {
        Ok(saved) => {
            info!(path = %path.display(), plies = saved.moves.len(), "game loaded");
            Some(saved)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "rejected saved game");
            None
        }
    }
}

/// Parse saved-game text and replay its moves.
pub fn parse(text: &str) -> Result<SavedGame, ChessError> {
    let mut tags = HashMap::new();
    let mut movetext = String::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('[') {
            if !movetext.is_empty() {
                return Err(invalid("tag pair after movetext"));
            }
            let (name, value) = parse_tag(line)?;
            tags.insert(name, value);
        } else {
            movetext.push_str(line);
            movetext.push(' ');
        }
    }

    let session = SessionInfo {
        mode: required(&tags, "Mode")?.to_string(),
        ai_level: required(&tags, "AiLevel")?
            .parse()
            .map_err(|_| invalid("AiLevel is not an integer"))?,
        white_is_human: required(&tags, "WhiteIsHuman")?
            .parse()
            .map_err(|_| invalid("WhiteIsHuman is not true/false"))?,
    };
    let date = tags
        .get("Date")
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y.%m.%d").ok());
    if let Some(result) = tags.get("Result")
        && !RESULT_TOKENS.contains(&result.as_str())
    {
        return Err(invalid(format!("unknown result {result:?}")));
    }

    let mut board = Board::starting();
    let mut moves = Vec::new();
    let mut finished = false;
    for token in movetext_tokens(&movetext)? {
        if finished {
            return Err(invalid(format!("{token:?} after the result")));
        }
        if RESULT_TOKENS.contains(&token) {
            finished = true;
            continue;
        }
        let Some(token) = strip_move_number(token) else {
            continue;
        };
        let (from, to, promotion) = parse_move(token)?;
        let side = side_after(moves.len());
        let mv = RuleEngine::new(&board)
            .resolve_move(side, from, to, promotion)
            .map_err(|e| invalid(format!("ply {} ({token}): {e}", moves.len() + 1)))?;
        if !board.apply_move(&mv) {
            let ply = moves.len() + 1;
            return Err(invalid(format!("ply {ply} ({token}) could not be applied")));
        }
        moves.push(mv);
    }

    Ok(SavedGame {
        session,
        date,
        moves,
        board,
    })
}

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::InvalidPgn(reason.into())
}

fn required<'t>(tags: &'t HashMap<String, String>, name: &str) -> Result<&'t str, ChessError> {
    tags.get(name)
        .map(String::as_str)
        .ok_or_else(|| invalid(format!("missing {name} tag")))
}

/// `[Name "value"]` with `\"` and `\\` escapes.
fn parse_tag(line: &str) -> Result<(String, String), ChessError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(|| invalid(format!("malformed tag {line:?}")))?;
    let (name, rest) = inner
        .split_once(char::is_whitespace)
        .ok_or_else(|| invalid(format!("malformed tag {line:?}")))?;
    let quoted = rest
        .trim()
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .ok_or_else(|| invalid(format!("tag {name} value is not quoted")))?;

    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped @ ('"' | '\\')) => value.push(escaped),
                _ => return Err(invalid(format!("bad escape in tag {name}"))),
            }
        } else {
            value.push(ch);
        }
    }
    Ok((name.to_string(), value))
}

/// Whitespace-separated tokens with `{...}` comments removed.
fn movetext_tokens(movetext: &str) -> Result<Vec<&str>, ChessError> {
    let mut tokens = Vec::new();
    let mut rest = movetext;
    while let Some(open) = rest.find('{') {
        tokens.extend(rest[..open].split_whitespace());
        let close = rest[open..]
            .find('}')
            .ok_or_else(|| invalid("unterminated comment"))?;
        rest = &rest[open + close + 1..];
    }
    tokens.extend(rest.split_whitespace());
    Ok(tokens)
}

/// Drop a leading `12.` or `12...`. `None` for a bare move number.
fn strip_move_number(token: &str) -> Option<&str> {
    let digits = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if digits.len() == token.len() || !digits.starts_with('.') {
        return Some(token);
    }
    let rest = digits.trim_start_matches('.');
    (!rest.is_empty()).then_some(rest)
}

/// `e2e4`, `e7e8=Q` or `e7e8q`.
fn parse_move(token: &str) -> Result<(Coordinate, Coordinate, Option<PieceKind>), ChessError> {
    let bad = || invalid(format!("unreadable move {token:?}"));
    let from = token
        .get(0..2)
        .and_then(Coordinate::from_algebraic)
        .ok_or_else(bad)?;
    let to = token
        .get(2..4)
        .and_then(Coordinate::from_algebraic)
        .ok_or_else(bad)?;
    let suffix = token.get(4..).ok_or_else(bad)?;
    let promotion = match suffix.strip_prefix('=').unwrap_or(suffix) {
        "" => None,
        code => Some(PieceKind::promotion_from_str(code).ok_or_else(bad)?),
    };
    Ok((from, to, promotion))
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionInfo {
        SessionInfo {
            mode: "Human vs AI".into(),
            ai_level: 7,
            white_is_human: false,
        }
    }

    fn play(line: &[&str]) -> (Board, Vec<Move>) {
        let mut board = Board::starting();
        let mut moves = Vec::new();
        for (i, token) in line.iter().enumerate() {
            let (from, to, promo) = parse_move(token).unwrap();
            let mv = RuleEngine::new(&board)
                .resolve_move(side_after(i), from, to, promo)
                .unwrap();
            board.apply_move(&mv);
            moves.push(mv);
        }
        (board, moves)
    }

    #[test]
    fn empty_game_text() {
        let pgn = to_pgn(&[], &session(), GameStatus::Active);
        assert!(pgn.contains("[Event \"Casual Game\"]"));
        assert!(pgn.contains("[Mode \"Human vs AI\"]"));
        assert!(pgn.contains("[AiLevel \"7\"]"));
        assert!(pgn.contains("[WhiteIsHuman \"false\"]"));
        assert!(pgn.ends_with("\n\n*\n"));
    }

    #[test]
    fn movetext_numbers_pairs() {
        let (_, moves) = play(&["e2e4", "e7e5", "g1f3"]);
        let pgn = to_pgn(&moves, &session(), GameStatus::Active);
        assert!(pgn.contains("1. e2e4 e7e5 2. g1f3 *"), "{pgn}");
    }

    #[test]
    fn fools_mate_result_and_reload() {
        let (board, moves) = play(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        let pgn = to_pgn(&moves, &session(), GameStatus::Checkmate);
        assert!(pgn.contains("[Result \"0-1\"]"));

        let saved = parse(&pgn).unwrap();
        assert_eq!(saved.moves.len(), 4);
        assert_eq!(saved.board, board);
        assert_eq!(saved.session, session());
        assert_eq!(saved.side_to_move(), Color::White);
        assert!(saved.date.is_some());
        assert!(RuleEngine::new(&saved.board).is_checkmate(Color::White));
    }

    #[test]
    fn long_games_wrap() {
        let line = [
            "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6",
            "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
        ];
        let (_, moves) = play(&line);
        let pgn = to_pgn(&moves, &session(), GameStatus::Active);
        assert!(pgn.lines().all(|l| l.len() <= MAX_LINE));
        assert_eq!(parse(&pgn).unwrap().moves.len(), line.len());
    }

    #[test]
    fn tag_escapes_survive() {
        let mut s = session();
        s.mode = r#"Club "Blitz" \ night"#.into();
        let pgn = to_pgn(&[], &s, GameStatus::Active);
        assert_eq!(parse(&pgn).unwrap().session.mode, s.mode);
    }

    #[test]
    fn accepts_comments_and_compact_numbers() {
        let text = "[Mode \"x\"]\n[AiLevel \"1\"]\n[WhiteIsHuman \"true\"]\n\n\
                    1.e2e4 {king pawn} e7e5 2... g1f3 *\n";
        assert_eq!(parse(text).unwrap().moves.len(), 3);
    }

    #[test]
    fn promotion_suffixes() {
        assert_eq!(parse_move("e7e8=N").unwrap().2, Some(PieceKind::Knight));
        assert_eq!(parse_move("e7e8q").unwrap().2, Some(PieceKind::Queen));
        assert!(parse_move("e7e8=K").is_err());
        assert!(parse_move("e7").is_err());
        assert!(parse_move("z9e4").is_err());
    }

    #[test]
    fn rejects_bad_files() {
        let header = "[Mode \"x\"]\n[AiLevel \"3\"]\n[WhiteIsHuman \"true\"]\n\n";
        for movetext in ["1. e2e5 *", "1. e7e5 *", "1. e2e4 * e7e5", "1. e2e4 {oops"] {
            let text = format!("{header}{movetext}\n");
            assert!(
                matches!(parse(&text), Err(ChessError::InvalidPgn(_))),
                "{movetext}"
            );
        }
        assert!(parse("[AiLevel \"3\"]\n[WhiteIsHuman \"true\"]\n\n*\n").is_err());
        assert!(parse("[Mode \"x\"]\n[AiLevel \"hard\"]\n[WhiteIsHuman \"true\"]\n\n*\n").is_err());
        assert!(parse("[Mode \"x\"]\n[AiLevel \"3\"]\n[WhiteIsHuman \"yes\"]\n\n*\n").is_err());
        assert!(parse("[Mode x]\n").is_err());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path().join("nope.pgn")).is_none());
    }
}
