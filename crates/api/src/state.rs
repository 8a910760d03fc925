//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use analyzer::AnalysisService;
use database::Database;

use crate::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Analysis handler; `None` when no provider key is configured.
    pub analyzer: Option<Arc<AnalysisService>>,
    /// Server configuration.
    pub config: Arc<Config>,
    /// Per-call provider timeout, reported by the health check.
    pub openai_timeout: Duration,
    /// Upper bound on one `/api/chat` request: every attempt the retry
    /// policy allows, each running up to `openai_timeout`.
    pub chat_deadline: Duration,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        analyzer: Option<Arc<AnalysisService>>,
        config: Config,
        openai_timeout: Duration,
    ) -> Self {
        let retry = analyzer
            .as_ref()
            .map(|analyzer| analyzer.config().retry)
            .unwrap_or_default();

        Self {
            db,
            analyzer,
            config: Arc::new(config),
            openai_timeout,
            chat_deadline: retry.worst_case(openai_timeout),
        }
    }
}
