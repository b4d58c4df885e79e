//! Application configuration.
//!
//! Values are resolved once at startup with priority
//! `config.toml` > environment (including `.env`) > defaults, and the
//! resulting [`Config`] is handed to the services that need it.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 5001;

/// Default document store location
pub const DEFAULT_DATABASE_PATH: &str = "data/ai_checker.db";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling temperature for every provider call
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Number of attempts returned by the history endpoint
pub const HISTORY_LIMIT: i64 = 10;

/// Configuration file read from the working directory
pub const CONFIG_FILE: &str = "config.toml";

// ==================== config.toml ====================

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
    ai: Option<AiSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    port: Option<u16>,
}

/// No API key here; it is only read from the environment
#[derive(Debug, Deserialize)]
struct AiSection {
    model: Option<String>,
    base_url: Option<String>,
}

// ==================== Resolved configuration ====================

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub port: u16,
    pub ai: AiConfig,
}

impl Config {
    /// Load `.env`, read `config.toml` if present, and resolve all values
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        let file = read_config_file(CONFIG_FILE);
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = match file.database.and_then(|d| d.path) {
            Some(path) => {
                tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
                PathBuf::from(path)
            }
            None => match env("DATABASE_PATH") {
                Some(path) => {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                }
                None => {
                    tracing::info!("Using default database path: {}", DEFAULT_DATABASE_PATH);
                    PathBuf::from(DEFAULT_DATABASE_PATH)
                }
            },
        };

        let port = file
            .server
            .and_then(|s| s.port)
            .or_else(|| {
                env("PORT").and_then(|p| match p.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid PORT value: {}", p);
                        None
                    }
                })
            })
            .unwrap_or(DEFAULT_PORT);

        let (file_model, file_base_url) = match file.ai {
            Some(ai) => (ai.model, ai.base_url),
            None => (None, None),
        };

        let ai = AiConfig {
            api_key: env("GEMINI_API_KEY"),
            model: file_model
                .or_else(|| env("GEMINI_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: file_base_url
                .or_else(|| env("GEMINI_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
        };

        Self {
            database_path,
            port,
            ai,
        }
    }

    /// Full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", SERVER_ADDR, self.port)
    }
}

fn read_config_file(path: &str) -> FileConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return FileConfig::default();
    };
    parse_config_file(&contents, path)
}

fn parse_config_file(contents: &str, path: &str) -> FileConfig {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", path, e);
            FileConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> Box<dyn Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Box::new(move |key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(FileConfig::default(), env_from(&[]));
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.ai.api_key, None);
        assert_eq!(config.ai.model, DEFAULT_MODEL);
        assert_eq!(config.ai.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.bind_addr(), "0.0.0.0:5001");
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_from(&[
            ("DATABASE_PATH", "/tmp/store.db"),
            ("PORT", "8080"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ]);
        let config = Config::resolve(FileConfig::default(), env);
        assert_eq!(config.database_path, PathBuf::from("/tmp/store.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.ai.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_config_file_wins_over_env() {
        let file = parse_config_file(
            r#"
            [database]
            path = "from-file.db"

            [server]
            port = 9000

            [ai]
            model = "file-model"
            "#,
            "test.toml",
        );
        let env = env_from(&[("DATABASE_PATH", "env.db"), ("PORT", "8080"), ("GEMINI_MODEL", "env-model")]);
        let config = Config::resolve(file, env);
        assert_eq!(config.database_path, PathBuf::from("from-file.db"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.ai.model, "file-model");
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = Config::resolve(FileConfig::default(), env_from(&[("GEMINI_API_KEY", "  ")]));
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::resolve(FileConfig::default(), env_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let file = parse_config_file("[database\npath = ", "bad.toml");
        assert!(file.database.is_none());
    }
}
