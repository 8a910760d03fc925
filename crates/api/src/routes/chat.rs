//! Analysis endpoint.

use analyzer::{ChatOutcome, ChatRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use completion_core::{ChatMessage, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    messages: Vec<WireMessage>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    usuario: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    id: String,
    model: String,
    choices: Vec<ChatChoice>,
    /// Seconds, two decimals.
    processing_time: f64,
    retries: u32,
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct ChatChoice {
    index: u32,
    message: ChatMessageResponse,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ChatMessageResponse {
    role: String,
    content: String,
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Some(analyzer) = state.analyzer.as_ref() else {
        return Err(ApiError::NotConfigured);
    };
    let Json(body) = payload?;

    let request = to_chat_request(body)?;
    let outcome = tokio::time::timeout(state.chat_deadline, analyzer.handle_chat(request))
        .await
        .map_err(|_| ApiError::Timeout(state.chat_deadline))??;

    Ok(Json(to_response(outcome)))
}

fn to_chat_request(body: ChatBody) -> Result<ChatRequest> {
    let messages = body
        .messages
        .into_iter()
        .map(|msg| {
            let role = Role::parse(&msg.role)
                .ok_or_else(|| ApiError::BadRequest(format!("invalid role: {:?}", msg.role)))?;
            let content = extract_text(&msg.content).unwrap_or_default();
            Ok(ChatMessage::new(role, content))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChatRequest {
        messages,
        model: body.model,
        max_output_tokens: body.max_tokens,
        temperature: body.temperature,
        caller_id: body.usuario,
    })
}

fn extract_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let mut parts = Vec::new();
            for item in items {
                if let Some(text) = item.get("text").and_then(|t| t.as_str()) {
                    parts.push(text);
                }
            }
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(""))
            }
        }
        _ => None,
    }
}

fn to_response(outcome: ChatOutcome) -> ChatResponse {
    let processing_time = (outcome.elapsed.as_secs_f64() * 100.0).round() / 100.0;

    ChatResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4()),
        model: outcome.model,
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessageResponse {
                role: "assistant".to_string(),
                content: outcome.content,
            },
            finish_reason: outcome.finish_reason.unwrap_or_else(|| "stop".to_string()),
        }],
        processing_time,
        retries: outcome.retries,
        truncated: outcome.truncated,
    }
}
