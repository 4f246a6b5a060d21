use std::sync::Arc;

use storyforge_llm::TextGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storyforge_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Text generation backend. `None` when no API key is configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
}
