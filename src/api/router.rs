use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::SharedState;

/// Build the Axum router with all routes and middleware.
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Games
        .route("/api/games", post(handlers::create_game))
        .route("/api/games/import", post(handlers::import_game))
        .route("/api/games/{id}", get(handlers::get_game))
        // Turns
        .route("/api/games/{id}/moves", post(handlers::make_move))
        .route("/api/games/{id}/ai-move", post(handlers::ai_move))
        // Queries
        .route("/api/games/{id}/legal-moves", get(handlers::legal_moves))
        .route("/api/games/{id}/hint", get(handlers::hint))
        // Persistence
        .route("/api/games/{id}/pgn", get(handlers::export_pgn))
        .route("/api/games/{id}/save", post(handlers::save_game))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
