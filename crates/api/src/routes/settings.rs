//! Per-caller settings endpoints.

use analyzer::{settings, SettingsUpdate};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use axum::http::HeaderMap;
use database::settings::{default_settings, DEFAULT_SETTINGS_KEY};
use database::SettingsRecord;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Result;
use crate::state::AppState;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsBody {
    api_key: Option<String>,
    modelo: Option<String>,
    max_tokens: Option<i64>,
    chunk_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    modelo: String,
    max_tokens: i64,
    chunk_size: i64,
    /// True when the values are the built-in defaults.
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveSettingsResponse {
    success: bool,
    message: String,
    modelo: String,
    max_tokens: i64,
    chunk_size: i64,
}

impl SettingsResponse {
    fn from_record(record: SettingsRecord, cached: bool) -> Self {
        Self {
            modelo: record.model,
            max_tokens: record.max_output_tokens,
            chunk_size: record.chunk_size,
            cached,
            error: None,
        }
    }
}

fn header_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `GET /api/settings`
///
/// A store failure still answers 200 with the defaults so the frontend can
/// fall back to them.
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Option<Query<SettingsQuery>>,
) -> Json<SettingsResponse> {
    let key = header_key(&headers).or_else(|| query.and_then(|Query(q)| q.api_key));

    match settings::get_settings(&state.db, key.as_deref()).await {
        Ok(view) => Json(SettingsResponse::from_record(view.record, !view.stored)),
        Err(e) => {
            error!("Failed to load settings: {}", e);
            let defaults = default_settings(key.as_deref().unwrap_or(DEFAULT_SETTINGS_KEY));
            let mut response = SettingsResponse::from_record(defaults, true);
            response.error = Some(e.to_string());
            Json(response)
        }
    }
}

/// `POST /api/settings`
pub async fn save_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<SettingsBody>, JsonRejection>,
) -> Result<Json<SaveSettingsResponse>> {
    let Json(body) = payload?;
    let key = body.api_key.or_else(|| header_key(&headers));

    let defaults = SettingsUpdate::default();
    let update = SettingsUpdate {
        model: body.modelo.unwrap_or(defaults.model),
        max_output_tokens: body.max_tokens.unwrap_or(defaults.max_output_tokens),
        chunk_size: body.chunk_size.unwrap_or(defaults.chunk_size),
    };

    let record = settings::save_settings(&state.db, key.as_deref(), &update).await?;

    Ok(Json(SaveSettingsResponse {
        success: true,
        message: "Configurações salvas com sucesso".to_string(),
        modelo: record.model,
        max_tokens: record.max_output_tokens,
        chunk_size: record.chunk_size,
    }))
}
