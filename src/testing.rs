//! Test utilities: a scripted provider and a server over a temporary store.
//!
//! Reuses the production router and schema initialization so handler tests
//! exercise the same code paths as the running service.

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::ai::{AiClient, AiProvider, ProviderError};
use crate::config::{AiConfig, Config, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_TEMPERATURE};
use crate::db;
use crate::handlers;
use crate::state::AppState;

/// Provider that replays canned replies and records every prompt it receives.
///
/// Once the script runs out every call fails with `EmptyReply`.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompt and schema of each call so far
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, prompt: &str, schema: &Value) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), schema.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyReply))
    }
}

/// Shorthand for a successful scripted reply
pub fn reply(text: &str) -> Result<String, ProviderError> {
    Ok(text.to_string())
}

/// Shorthand for a failed scripted reply
pub fn failure() -> Result<String, ProviderError> {
    Err(ProviderError::Status {
        status: 503,
        body: "unavailable".to_string(),
    })
}

/// Application state over a temporary database, dropped with the directory.
pub struct TestEnv {
    /// Keeps the database directory alive until the environment drops
    _temp: TempDir,
    pub state: AppState,
    pub provider: Option<Arc<ScriptedProvider>>,
}

impl TestEnv {
    /// Environment whose provider answers with `replies` in order
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self::build(Some(Arc::new(ScriptedProvider::new(replies))))
    }

    /// Environment with no provider configured (missing API key)
    pub fn without_provider() -> Self {
        Self::build(None)
    }

    fn build(provider: Option<Arc<ScriptedProvider>>) -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let database_path = temp.path().join("store.db");
        let pool = db::init_db(&database_path).expect("init test database");

        let config = Config {
            database_path,
            port: DEFAULT_PORT,
            ai: AiConfig {
                api_key: provider.as_ref().map(|_| "test-key".to_string()),
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
            },
        };

        let ai = AiClient::new(provider.clone().map(|p| p as Arc<dyn AiProvider>));
        let state = AppState::new(pool, ai, config);

        Self {
            _temp: temp,
            state,
            provider,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(handlers::router(self.state.clone())).expect("build test server")
    }

    /// Prompt and schema of each provider call so far
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.provider.as_ref().map(|p| p.calls()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_file_lives_with_env() {
        let env = TestEnv::without_provider();
        let path = env.state.config.database_path.clone();
        assert!(path.exists());

        drop(env);
        assert!(!path.exists());
    }
}
