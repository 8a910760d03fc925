//! History listing endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use database::HistoryRecord;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    historico: Vec<HistoryEntry>,
    total: i64,
    limit: i64,
    offset: i64,
}

#[derive(Debug, Serialize)]
struct HistoryEntry {
    id: i64,
    usuario: String,
    prompt: String,
    resposta: String,
    data: String,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: record.id,
            usuario: record.caller_id,
            prompt: record.prompt,
            resposta: record.response,
            data: record.created_at,
        }
    }
}

/// `GET /api/historico?limit&offset`
pub async fn list_history(
    State(state): State<AppState>,
    params: std::result::Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>> {
    let Query(params) = params?;
    let page = analyzer::history::get_history(&state.db, params.limit, params.offset).await?;

    Ok(Json(HistoryResponse {
        historico: page.records.into_iter().map(HistoryEntry::from).collect(),
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use database::{history, NewHistoryRecord};

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_history_page() {
        let app = test_app(None).await;
        for n in 0..3 {
            history::insert_history(
                app.db.pool(),
                &NewHistoryRecord {
                    caller_id: "anonimo".to_string(),
                    prompt: format!("prompt {}", n),
                    response: "r".repeat(1500),
                },
            )
            .await
            .unwrap();
        }

        let (status, body) = send(&app.router, get("/api/historico?limit=2&offset=-4")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["offset"], 0);

        let entries = body["historico"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["prompt"], "prompt 2");
        assert_eq!(entries[0]["usuario"], "anonimo");
        assert_eq!(entries[0]["resposta"].as_str().unwrap().chars().count(), 1003);
        assert!(entries[0]["data"].is_string());
    }

    #[tokio::test]
    async fn test_history_limit_capped() {
        let app = test_app(None).await;
        let (status, body) = send(&app.router, get("/api/historico?limit=5000")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], 100);
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_bad_query_is_400() {
        let app = test_app(None).await;
        let (status, body) = send(&app.router, get("/api/historico?limit=lots")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
