//! Application state shared by all handlers.

use std::sync::Arc;

use crate::ai::AiClient;
use crate::config::Config;
use crate::db::DbPool;

/// Process-wide handles, created once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    /// Document store connection
    pub db: DbPool,

    /// AI provider adapter
    pub ai: AiClient,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, ai: AiClient, config: Config) -> Self {
        Self {
            db,
            ai,
            config: Arc::new(config),
        }
    }
}
