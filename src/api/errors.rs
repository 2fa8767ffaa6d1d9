use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::engine::ChessError;

/// Everything a handler can fail with. Rendered as
/// `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("game not found: {0}")]
    GameNotFound(String),

    #[error("no loadable saved game named {0}")]
    SaveNotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Chess(#[from] ChessError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound(_) | ApiError::SaveNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Chess(err) => match err {
                ChessError::NotYourTurn(_) => StatusCode::CONFLICT,
                ChessError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::GameNotFound(_) => "GAME_NOT_FOUND",
            ApiError::SaveNotFound(_) => "SAVE_NOT_FOUND",
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::Chess(err) => match err {
                ChessError::InvalidMove { .. } => "INVALID_MOVE",
                ChessError::InvalidPgn(_) => "INVALID_PGN",
                ChessError::GameOver(_) => "GAME_OVER",
                ChessError::NotYourTurn(_) => "NOT_YOUR_TURN",
                ChessError::Io(_) => "INTERNAL_ERROR",
                ChessError::InvalidSquare(_)
                | ChessError::InvalidFen(_)
                | ChessError::InvalidPromotion(_)
                | ChessError::InconsistentMove(_) => "INVALID_REQUEST",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Color;
    use http_body_util::BodyExt;

    async fn rendered(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unknown_game_is_404() {
        let (status, json) = rendered(ApiError::GameNotFound("abc".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "GAME_NOT_FOUND");
        assert_eq!(json["error"]["message"], "game not found: abc");
    }

    #[tokio::test]
    async fn wrong_side_is_409() {
        let (status, json) = rendered(ChessError::NotYourTurn(Color::Black).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "NOT_YOUR_TURN");
        assert_eq!(json["error"]["message"], "it is Black's turn");
    }

    #[tokio::test]
    async fn io_failure_is_500() {
        let io = std::io::Error::other("disk full");
        let (status, json) = rendered(ChessError::from(io).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn client_mistakes_are_400() {
        let cases: [(ApiError, &str); 4] = [
            (ApiError::InvalidRequest("bad input".into()), "INVALID_REQUEST"),
            (ChessError::InvalidPgn("bad tag".into()).into(), "INVALID_PGN"),
            (ChessError::InvalidPromotion("king".into()).into(), "INVALID_REQUEST"),
            (ChessError::GameOver("checkmate".into()).into(), "GAME_OVER"),
        ];
        for (err, code) in cases {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.code(), code);
        }
    }
}
