use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use crate::ai::{Strategy, hints};
use crate::engine::game::Game;
use crate::engine::types::{ChessError, Coordinate, PieceKind};

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: "tiered-chess".to_string(),
        uptime,
    })
}

// =========================================================================
// Create Game
// =========================================================================

/// POST /api/games
pub async fn create_game(
    State(state): State<SharedState>,
    Json(input): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let game = match input.mode.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("human-vs-ai") => Game::human_vs_ai(
            input.ai_level.unwrap_or(state.config.default_ai_level),
            input.white_is_human.unwrap_or(true),
        ),
        Some("human-vs-human") => Game::human_vs_human(),
        Some(other) => {
            return Err(ApiError::InvalidRequest(format!(
                "unknown mode {other:?}; expected human-vs-human or human-vs-ai"
            )));
        }
    };

    let response = game_to_response(&game);
    state.games.write().await.insert(game.id().to_string(), game);
    Ok((StatusCode::CREATED, Json(response)))
}

// =========================================================================
// Get Game
// =========================================================================

/// GET /api/games/:id
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    Ok(Json(game_to_response(game)))
}

// =========================================================================
// Make Move
// =========================================================================

/// POST /api/games/:id/moves
pub async fn make_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<GameResponse>, ApiError> {
    let from = parse_square(&input.from)?;
    let to = parse_square(&input.to)?;
    let promotion = input
        .promotion
        .as_deref()
        .map(|p| {
            PieceKind::promotion_from_str(p)
                .ok_or_else(|| ChessError::InvalidPromotion(p.to_string()))
        })
        .transpose()?;

    let mut games = state.games.write().await;
    let game = games
        .get_mut(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    game.play(from, to, promotion)?;
    Ok(Json(game_to_response(game)))
}

// =========================================================================
// AI Move
// =========================================================================

/// POST /api/games/:id/ai-move
///
/// Move selection is a one-ply heuristic over a few dozen moves, so it runs
/// inline under the write lock.
pub async fn ai_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AiMoveResponse>, ApiError> {
    let mut games = state.games.write().await;
    let game = games
        .get_mut(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let strategy = game
        .player(game.side_to_move())
        .ai_level()
        .map(Strategy::for_level);
    let start = Instant::now();
    let played = game.play_ai_turn()?;
    let thinking_time = start.elapsed().as_millis() as u64;

    Ok(Json(AiMoveResponse {
        ai_move: played.as_ref().map(move_entry),
        strategy: strategy.map(Strategy::name).unwrap_or_default().to_string(),
        game: game_to_response(game),
        thinking_time,
    }))
}

// =========================================================================
// Legal Moves
// =========================================================================

/// GET /api/games/:id/legal-moves
pub async fn legal_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<LegalMovesQuery>,
) -> Result<Json<LegalMovesResponse>, ApiError> {
    let from = query.from.as_deref().map(parse_square).transpose()?;

    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let moves = game
        .legal_moves()
        .iter()
        .filter(|mv| from.is_none_or(|sq| mv.from() == sq))
        .map(legal_move_entry)
        .collect();

    Ok(Json(LegalMovesResponse { moves }))
}

// =========================================================================
// Hint
// =========================================================================

/// GET /api/games/:id/hint
pub async fn hint(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<HintResponse>, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let side = game.side_to_move();
    Ok(Json(HintResponse {
        side: color_name(side).to_string(),
        hints: hints(game.board(), side),
    }))
}

// =========================================================================
// Export / Save / Import
// =========================================================================

/// GET /api/games/:id/pgn
pub async fn export_pgn(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        game.to_pgn(),
    ))
}

/// POST /api/games/:id/save
///
/// Writes the game to `<save_dir>/<id>.pgn`.
pub async fn save_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SaveResponse>, ApiError> {
    let games = state.games.read().await;
    let game = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let path = state
        .save_path(&id)
        .ok_or_else(|| ApiError::InvalidRequest(format!("game id {id:?} is not a file name")))?;
    game.save(&path)?;
    Ok(Json(SaveResponse {
        id,
        saved: true,
        plies: game.history().len(),
    }))
}

/// POST /api/games/import
///
/// Body carries either the saved text (`pgn`) or the id of a game earlier
/// written with `/save` (`saved`). The result is a new game.
pub async fn import_game(
    State(state): State<SharedState>,
    Json(input): Json<ImportRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let game = match (input.pgn, input.saved) {
        (Some(text), None) => Game::from_pgn(&text)?,
        (None, Some(name)) => {
            let path = state
                .save_path(&name)
                .ok_or_else(|| ApiError::InvalidRequest(format!("bad save name {name:?}")))?;
            Game::load(&path).ok_or(ApiError::SaveNotFound(name))?
        }
        _ => {
            return Err(ApiError::InvalidRequest(
                "provide exactly one of pgn or saved".into(),
            ));
        }
    };

    info!(id = %game.id(), plies = game.history().len(), "game imported");
    let response = game_to_response(&game);
    state.games.write().await.insert(game.id().to_string(), game);
    Ok((StatusCode::CREATED, Json(response)))
}

// =========================================================================
// Helpers
// =========================================================================

fn parse_square(s: &str) -> Result<Coordinate, ApiError> {
    Coordinate::from_algebraic(s)
        .ok_or_else(|| ApiError::InvalidRequest(format!("invalid square: {s}")))
}

// =========================================================================
// Tests
// =========================================================================
