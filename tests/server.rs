//! End-to-end tests against a live listener.
//!
//! Spins up the real HTTP server on an OS-assigned port and drives a short
//! human-vs-computer game over plain HTTP/1.1.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use tiered_chess::api::router::create_router;
use tiered_chess::api::state::AppState;
use tiered_chess::config::AppConfig;

/// Helper: start the server on an OS-assigned port, return its address.
async fn start_server() -> String {
    let state = AppState::new(AppConfig::default());
    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

/// Helper: one request over a fresh connection, return (status, body).
async fn request(addr: &str, method: &str, path: &str, body: Option<&str>) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let payload = body.unwrap_or("");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
        payload.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut raw))
        .await
        .expect("timed out waiting for response")
        .unwrap();
    let text = String::from_utf8(raw).unwrap();

    let (head, body) = text.split_once("\r\n\r\n").expect("malformed response");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("missing status code");
    (status, body.to_string())
}

async fn request_json(
    addr: &str,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, serde_json::Value) {
    let (status, body) = request(addr, method, path, body).await;
    (status, serde_json::from_str(&body).expect("invalid JSON"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_over_the_wire() {
    let addr = start_server().await;
    let (status, json) = request_json(&addr, "GET", "/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn human_and_computer_alternate() {
    let addr = start_server().await;

    let (status, json) =
        request_json(&addr, "POST", "/api/games", Some(r#"{"aiLevel":10}"#)).await;
    assert_eq!(status, 201);
    let id = json["id"].as_str().unwrap().to_string();

    for (from, to) in [("e2", "e4"), ("d2", "d4"), ("g1", "f3")] {
        let body = format!(r#"{{"from":"{from}","to":"{to}"}}"#);
        let path = format!("/api/games/{id}/moves");
        let (status, json) = request_json(&addr, "POST", &path, Some(&body)).await;
        if status != 200 {
            // The computer may have made the planned move impossible.
            assert_eq!(json["error"]["code"], "INVALID_MOVE");
            break;
        }
        assert_eq!(json["currentPlayer"], "black");

        let path = format!("/api/games/{id}/ai-move");
        let (status, json) = request_json(&addr, "POST", &path, None).await;
        assert_eq!(status, 200);
        assert_eq!(json["strategy"], "hardest");
        assert_eq!(json["move"]["piece"]["color"], "black");
        assert_eq!(json["currentPlayer"], "white");
    }

    let (status, pgn) = request(&addr, "GET", &format!("/api/games/{id}/pgn"), None).await;
    assert_eq!(status, 200);
    assert!(pgn.contains("[Mode \"Human vs AI\"]"));
    assert!(pgn.contains("[AiLevel \"10\"]"));
    assert!(pgn.starts_with("[Event"));
}

#[tokio::test]
async fn unknown_game_is_404() {
    let addr = start_server().await;
    let (status, json) = request_json(&addr, "GET", "/api/games/missing/hint", None).await;
    assert_eq!(status, 404);
    assert_eq!(json["error"]["code"], "GAME_NOT_FOUND");
}
