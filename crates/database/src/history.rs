//! History log persistence.

use sqlx::SqlitePool;

use crate::models::{HistoryRecord, NewHistoryRecord};
use crate::Result;

/// Append a history record, returning its assigned ID.
pub async fn insert_history(pool: &SqlitePool, record: &NewHistoryRecord) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO history (caller_id, prompt, response)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&record.caller_id)
    .bind(&record.prompt)
    .bind(&record.response)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List history records, most recent first.
pub async fn list_recent(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<HistoryRecord>> {
    let rows = sqlx::query_as::<_, HistoryRecord>(
        r#"
        SELECT id, caller_id, prompt, response, created_at
        FROM history
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count all history records.
pub async fn count_history(pool: &SqlitePool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM history
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}
