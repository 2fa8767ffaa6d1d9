use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::engine::game::Game;

/// Live games keyed by id.
pub type GameStore = RwLock<HashMap<String, Game>>;

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState {
    pub games: GameStore,
    pub config: AppConfig,
    pub start_time: Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(AppState {
            games: RwLock::new(HashMap::new()),
            config,
            start_time: Instant::now(),
        })
    }

    /// File a saved game called `name` lives in, or `None` when the name
    /// could reach outside the save directory. Names are game ids: ASCII
    /// alphanumerics and `-`.
    pub fn save_path(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| self.config.save_dir.join(format!("{name}.pgn")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_path_stays_in_save_dir() {
        let state = AppState::new(AppConfig {
            save_dir: PathBuf::from("/var/chess"),
            ..AppConfig::default()
        });
        assert_eq!(
            state.save_path("0b1c-42"),
            Some(PathBuf::from("/var/chess/0b1c-42.pgn"))
        );
        assert_eq!(state.save_path(""), None);
        assert_eq!(state.save_path("../secrets"), None);
        assert_eq!(state.save_path("a/b"), None);
        assert_eq!(state.save_path("game.pgn"), None);
    }

    #[tokio::test]
    async fn starts_with_no_games() {
        let state = AppState::new(AppConfig::default());
        assert!(state.games.read().await.is_empty());
    }
}
