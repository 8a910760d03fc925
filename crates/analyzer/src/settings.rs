//! Per-caller settings operations.

use database::settings::{self, default_settings, SettingsUpdate, DEFAULT_SETTINGS_KEY};
use database::{Database, SettingsRecord};
use tracing::info;

use crate::error::Result;

/// Settings as shown to a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    pub record: SettingsRecord,
    /// False when `record` is the built-in default.
    pub stored: bool,
}

fn normalize_key(key: Option<&str>) -> &str {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_SETTINGS_KEY)
}

/// Stored settings for `key`, or the defaults when none are stored.
pub async fn get_settings(db: &Database, key: Option<&str>) -> Result<SettingsView> {
    let key = normalize_key(key);

    let view = match settings::get_settings(db.pool(), key).await? {
        Some(record) => SettingsView {
            record,
            stored: true,
        },
        None => SettingsView {
            record: default_settings(key),
            stored: false,
        },
    };

    Ok(view)
}

/// Validate and store settings for `key`.
///
/// Invalid values are reported as `InvalidInput` and leave the store untouched.
pub async fn save_settings(
    db: &Database,
    key: Option<&str>,
    update: &SettingsUpdate,
) -> Result<SettingsRecord> {
    let key = normalize_key(key);
    let record = settings::upsert_settings(db.pool(), key, update).await?;

    info!(
        model = %record.model,
        max_output_tokens = record.max_output_tokens,
        chunk_size = record.chunk_size,
        "Settings saved"
    );

    Ok(record)
}
