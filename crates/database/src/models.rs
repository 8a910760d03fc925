//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored analysis exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Caller that submitted the request (e.g., "anonimo").
    pub caller_id: String,
    /// JSON-serialized message list.
    pub prompt: String,
    /// Generated analysis.
    pub response: String,
    /// Creation timestamp (UTC, `YYYY-MM-DD HH:MM:SS`).
    pub created_at: String,
}

/// A history record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
    pub caller_id: String,
    pub prompt: String,
    pub response: String,
}

/// Stored analysis preferences for a caller key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SettingsRecord {
    /// Caller API key, or "default".
    pub key: String,
    /// Preferred model (e.g., "gpt-5", "gpt-4o").
    pub model: String,
    /// Preferred output budget.
    pub max_output_tokens: i64,
    /// Client-side document chunk size.
    pub chunk_size: i64,
    /// Last update timestamp.
    pub updated_at: String,
}
