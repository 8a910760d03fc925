//! Health check endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::history;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: &'static str,
    openai_configured: bool,
    database_working: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_records: Option<i64>,
    timeout_config: TimeoutConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TimeoutConfig {
    request_timeout: u64,
    openai_timeout: u64,
}

/// Liveness check.
pub async fn liveness() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

/// Readiness report: provider configured, database reachable, record count.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let timeout_config = TimeoutConfig {
        request_timeout: state.chat_deadline.as_secs(),
        openai_timeout: state.openai_timeout.as_secs(),
    };
    let openai_configured = state.analyzer.is_some();

    match history::count_history(state.db.pool()).await {
        Ok(total) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "ok",
                openai_configured,
                database_working: true,
                total_records: Some(total),
                timeout_config,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("Health check database query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthReport {
                    status: "error",
                    openai_configured,
                    database_working: false,
                    total_records: None,
                    timeout_config,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
