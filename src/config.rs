use std::path::PathBuf;

use crate::ai::strategy::Strategy;

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Difficulty used when a new game does not name one. Always 1..=10.
    pub default_ai_level: i32,
    /// Where exported games are written.
    pub save_dir: PathBuf,
}

const DEFAULT_PORT: u16 = 8083;
const DEFAULT_AI_LEVEL: i32 = 5;

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        AppConfig {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            host: lookup("HOST").unwrap_or(defaults.host),
            default_ai_level: lookup("CHESS_AI_LEVEL")
                .and_then(|v| v.trim().parse::<i32>().ok())
                .map(|level| level.clamp(Strategy::MIN_LEVEL, Strategy::MAX_LEVEL))
                .unwrap_or(defaults.default_ai_level),
            save_dir: lookup("CHESS_SAVE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.save_dir),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            default_ai_level: DEFAULT_AI_LEVEL,
            save_dir: PathBuf::from("saves"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8083);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_ai_level, 5);
        assert_eq!(config.save_dir, PathBuf::from("saves"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8083");
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8083);
        assert_eq!(config.default_ai_level, 5);
    }

    #[test]
    fn overrides_and_clamping() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
            ("CHESS_AI_LEVEL", "42"),
            ("CHESS_SAVE_DIR", "/tmp/chess"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.default_ai_level, 10);
        assert_eq!(config.save_dir, PathBuf::from("/tmp/chess"));

        let config = AppConfig::from_lookup(lookup(&[("CHESS_AI_LEVEL", "-2")]));
        assert_eq!(config.default_ai_level, 1);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config =
            AppConfig::from_lookup(lookup(&[("PORT", "http"), ("CHESS_AI_LEVEL", "hard")]));
        assert_eq!(config.port, 8083);
        assert_eq!(config.default_ai_level, 5);
    }
}
