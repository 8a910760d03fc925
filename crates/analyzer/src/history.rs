//! Paginated history view.

use database::{history, Database, HistoryRecord};
use serde::Serialize;

use crate::error::Result;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page ever returned.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Characters of the stored prompt shown in a listing.
pub const PROMPT_PREVIEW_CHARS: usize = 500;

/// Characters of the stored response shown in a listing.
pub const RESPONSE_PREVIEW_CHARS: usize = 1000;

/// One page of history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub records: Vec<HistoryRecord>,
    /// Unpaginated record count.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// List history most recent first, with previews cut to fixed lengths.
pub async fn get_history(db: &Database, limit: Option<i64>, offset: Option<i64>) -> Result<HistoryPage> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(0, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);

    let records = history::list_recent(db.pool(), limit, offset)
        .await?
        .into_iter()
        .map(|mut record| {
            record.prompt = preview(&record.prompt, PROMPT_PREVIEW_CHARS);
            record.response = preview(&record.response, RESPONSE_PREVIEW_CHARS);
            record
        })
        .collect();
    let total = history::count_history(db.pool()).await?;

    Ok(HistoryPage {
        records,
        total,
        limit,
        offset,
    })
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::NewHistoryRecord;

    async fn seeded_db(count: usize) -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        for n in 0..count {
            history::insert_history(
                db.pool(),
                &NewHistoryRecord {
                    caller_id: "anonimo".to_string(),
                    prompt: format!("prompt {}", n),
                    response: format!("response {}", n),
                },
            )
            .await
            .unwrap();
        }
        db
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("exactly10!", 10), "exactly10!");
        assert_eq!(preview("abcdefghijk", 10), "abcdefghij...");
        assert_eq!(preview("ããããã", 2), "ãã...");
    }

    #[tokio::test]
    async fn test_defaults_and_ordering() {
        let db = seeded_db(3).await;
        let page = get_history(&db, None, None).await.unwrap();

        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
        assert_eq!(page.total, 3);
        let prompts: Vec<_> = page.records.iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["prompt 2", "prompt 1", "prompt 0"]);
    }

    #[tokio::test]
    async fn test_limit_clamped_and_total_unpaginated() {
        let db = seeded_db(120).await;

        let page = get_history(&db, Some(1000), None).await.unwrap();
        assert_eq!(page.limit, 100);
        assert_eq!(page.records.len(), 100);
        assert_eq!(page.total, 120);

        let page = get_history(&db, Some(-5), Some(-3)).await.unwrap();
        assert_eq!(page.limit, 0);
        assert_eq!(page.offset, 0);
        assert!(page.records.is_empty());
        assert_eq!(page.total, 120);

        let page = get_history(&db, Some(10), Some(115)).await.unwrap();
        assert_eq!(page.records.len(), 5);
    }

    #[tokio::test]
    async fn test_long_fields_cut_in_view_only() {
        let db = seeded_db(0).await;
        history::insert_history(
            db.pool(),
            &NewHistoryRecord {
                caller_id: "anonimo".to_string(),
                prompt: "p".repeat(600),
                response: "r".repeat(1200),
            },
        )
        .await
        .unwrap();

        let page = get_history(&db, None, None).await.unwrap();
        let record = &page.records[0];
        assert_eq!(record.prompt, format!("{}...", "p".repeat(500)));
        assert_eq!(record.response, format!("{}...", "r".repeat(1000)));

        let stored = history::list_recent(db.pool(), 1, 0).await.unwrap();
        assert_eq!(stored[0].prompt.len(), 600);
    }
}
