//! Settings storage, keyed by caller.

use sqlx::SqlitePool;

use crate::models::SettingsRecord;
use crate::validation::{validate_model_length, validate_token_setting};
use crate::Result;

/// Key used when a caller does not identify itself.
pub const DEFAULT_SETTINGS_KEY: &str = "default";

/// Model returned when no settings are stored.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Output budget returned when no settings are stored.
pub const DEFAULT_MAX_OUTPUT_TOKENS: i64 = 8000;

/// Chunk size returned when no settings are stored.
pub const DEFAULT_CHUNK_SIZE: i64 = 8000;

/// Values written by [`upsert_settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub model: String,
    pub max_output_tokens: i64,
    pub chunk_size: i64,
}

impl Default for SettingsUpdate {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SettingsUpdate {
    /// Check every field without touching the store.
    pub fn validate(&self) -> std::result::Result<(), crate::ValidationError> {
        validate_model_length(&self.model)?;
        validate_token_setting("max_tokens", self.max_output_tokens)?;
        validate_token_setting("chunk_size", self.chunk_size)?;
        Ok(())
    }
}

/// Hardcoded record returned for keys without stored settings.
pub fn default_settings(key: &str) -> SettingsRecord {
    let defaults = SettingsUpdate::default();
    SettingsRecord {
        key: key.to_string(),
        model: defaults.model,
        max_output_tokens: defaults.max_output_tokens,
        chunk_size: defaults.chunk_size,
        updated_at: String::new(),
    }
}

/// Get the stored settings for a key.
pub async fn get_settings(pool: &SqlitePool, key: &str) -> Result<Option<SettingsRecord>> {
    let record = sqlx::query_as::<_, SettingsRecord>(
        r#"
        SELECT key, model, max_output_tokens, chunk_size, updated_at
        FROM settings
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Create or replace the settings for a key.
///
/// The update is validated first; an invalid update never reaches the store.
pub async fn upsert_settings(
    pool: &SqlitePool,
    key: &str,
    update: &SettingsUpdate,
) -> Result<SettingsRecord> {
    update.validate()?;

    let record = sqlx::query_as::<_, SettingsRecord>(
        r#"
        INSERT INTO settings (key, model, max_output_tokens, chunk_size)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            model = excluded.model,
            max_output_tokens = excluded.max_output_tokens,
            chunk_size = excluded.chunk_size,
            updated_at = datetime('now')
        RETURNING key, model, max_output_tokens, chunk_size, updated_at
        "#,
    )
    .bind(key)
    .bind(update.model.trim())
    .bind(update.max_output_tokens)
    .bind(update.chunk_size)
    .fetch_one(pool)
    .await?;

    Ok(record)
}
