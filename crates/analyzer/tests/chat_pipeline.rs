//! End-to-end tests for the analysis pipeline against scripted providers and
//! an in-memory database.

use std::sync::Arc;
use std::time::Duration;

use analyzer::{
    AnalysisError, AnalysisService, AnalyzerConfig, ChatRequest, HistoryWorker, HistoryWriter,
};
use completion_core::{
    estimate_tokens, serialized_len, ChatMessage, ModelLimits, ProviderError, RetryPolicy,
};
use database::{history, Database};
use mock_provider::{EchoProvider, ScriptedProvider};

async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn fast_config() -> AnalyzerConfig {
    AnalyzerConfig::builder()
        .retry(RetryPolicy::new(2, Duration::ZERO))
        .build()
}

struct Harness {
    db: Database,
    provider: Arc<ScriptedProvider>,
    service: AnalysisService,
    worker: HistoryWorker,
}

impl Harness {
    async fn new(provider: ScriptedProvider, config: AnalyzerConfig) -> Self {
        let db = test_db().await;
        let provider = Arc::new(provider);
        let (writer, worker) = HistoryWriter::spawn(db.clone(), 16);
        let service = AnalysisService::new(provider.clone(), config, writer);
        Self {
            db,
            provider,
            service,
            worker,
        }
    }

    /// Flush the history queue and return the stored record count.
    async fn drained_history_count(self) -> i64 {
        self.worker.drain(Duration::from_secs(5)).await;
        history::count_history(self.db.pool()).await.unwrap()
    }
}

fn report_request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("Analyze this report: ...")])
        .with_model("gpt-4")
        .with_max_output_tokens(500)
}

#[tokio::test]
async fn test_happy_path_returns_text_and_records_history() {
    let harness = Harness::new(ScriptedProvider::new().then_text("Summary: ..."), fast_config()).await;

    let outcome = harness.service.handle_chat(report_request()).await.unwrap();

    assert_eq!(outcome.content, "Summary: ...");
    assert_eq!(outcome.retries, 0);
    assert!(!outcome.truncated);
    assert_eq!(outcome.model, "gpt-4");
    assert_eq!(harness.provider.calls(), 1);

    let sent = &harness.provider.requests()[0];
    assert_eq!(sent.model, "gpt-4");
    assert_eq!(sent.max_output_tokens, 500);

    let db = harness.db.clone();
    assert_eq!(harness.drained_history_count().await, 1);

    let stored = history::list_recent(db.pool(), 10, 0).await.unwrap();
    assert_eq!(stored[0].caller_id, "anonimo");
    assert_eq!(stored[0].response, "Summary: ...");
    assert!(stored[0].prompt.contains("Analyze this report"));
}

#[tokio::test]
async fn test_empty_messages_make_no_provider_call() {
    let harness = Harness::new(ScriptedProvider::new().then_text("unused"), fast_config()).await;

    let err = harness
        .service
        .handle_chat(ChatRequest::new(vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::InvalidInput(ref msg) if msg == "no messages"));
    assert_eq!(harness.provider.calls(), 0);
    assert_eq!(harness.drained_history_count().await, 0);
}

#[tokio::test]
async fn test_blank_user_message_makes_no_provider_call() {
    let harness = Harness::new(ScriptedProvider::new().then_text("unused"), fast_config()).await;

    let request = ChatRequest::new(vec![
        ChatMessage::system("You are a document analyst"),
        ChatMessage::user("   "),
    ]);
    let err = harness.service.handle_chat(request).await.unwrap_err();

    assert!(matches!(err, AnalysisError::InvalidInput(ref msg) if msg == "empty user message"));
    assert_eq!(harness.provider.calls(), 0);
}

#[tokio::test]
async fn test_one_empty_then_text_reports_one_retry() {
    let harness = Harness::new(
        ScriptedProvider::new().then_empty().then_text("Second try"),
        fast_config(),
    )
    .await;

    let outcome = harness.service.handle_chat(report_request()).await.unwrap();

    assert_eq!(outcome.content, "Second try");
    assert_eq!(outcome.retries, 1);
    assert_eq!(harness.provider.calls(), 2);

    // Retries re-issue the identical call.
    let requests = harness.provider.requests();
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn test_always_empty_stops_at_retry_bound() {
    let harness = Harness::new(ScriptedProvider::new(), fast_config()).await;

    let err = harness.service.handle_chat(report_request()).await.unwrap_err();

    assert!(matches!(err, AnalysisError::EmptyUpstreamResponse { attempts: 3 }));
    assert_eq!(harness.provider.calls(), 3);
    assert_eq!(harness.drained_history_count().await, 0);
}

#[tokio::test]
async fn test_whitespace_only_counts_as_empty() {
    let harness = Harness::new(
        ScriptedProvider::new().then_text("  \n\t ").then_text("Real answer"),
        fast_config(),
    )
    .await;

    let outcome = harness.service.handle_chat(report_request()).await.unwrap();
    assert_eq!(outcome.content, "Real answer");
    assert_eq!(outcome.retries, 1);
}

#[tokio::test]
async fn test_transport_error_is_not_retried() {
    let harness = Harness::new(
        ScriptedProvider::new()
            .then_error(ProviderError::Network("connection reset".into()))
            .then_text("never reached"),
        fast_config(),
    )
    .await;

    let err = harness.service.handle_chat(report_request()).await.unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::UpstreamFailure(ProviderError::Network(_))
    ));
    assert_eq!(harness.provider.calls(), 1);
    assert_eq!(harness.drained_history_count().await, 0);
}

#[tokio::test]
async fn test_oversized_input_truncated_with_caveat() {
    let config = AnalyzerConfig::builder()
        .retry(RetryPolicy::none())
        .max_prompt_chars(1_000)
        .truncate_to_chars(200)
        .build();
    let harness = Harness::new(ScriptedProvider::new().then_text("Short summary"), config).await;

    let request = ChatRequest::new(vec![ChatMessage::user("word ".repeat(1_000))]);
    let outcome = harness.service.handle_chat(request).await.unwrap();

    assert!(outcome.truncated);
    assert!(outcome.content.starts_with("Short summary"));
    assert!(outcome.content.contains("may be incomplete"));

    let sent = &harness.provider.requests()[0].messages[0].content;
    assert!(sent.starts_with(&"word ".repeat(40)));
    assert!(sent.contains("4800 characters omitted"));
}

#[tokio::test]
async fn test_output_tokens_clamped_to_model_ceiling() {
    let provider = ScriptedProvider::new()
        .then_text("ok")
        .then_text("ok")
        .with_limits(ModelLimits {
            max_output_tokens: 1_000,
            context_window: 100_000,
        });
    let harness = Harness::new(provider, fast_config()).await;

    harness
        .service
        .handle_chat(report_request().with_max_output_tokens(50_000))
        .await
        .unwrap();
    harness
        .service
        .handle_chat(report_request().with_max_output_tokens(0))
        .await
        .unwrap();

    let requests = harness.provider.requests();
    assert_eq!(requests[0].max_output_tokens, 1_000);
    assert_eq!(requests[1].max_output_tokens, 1);
}

#[tokio::test]
async fn test_context_window_overflow_rejected() {
    let provider = ScriptedProvider::new()
        .then_text("unused")
        .with_limits(ModelLimits {
            max_output_tokens: 4_000,
            context_window: 1_000,
        });
    let harness = Harness::new(provider, fast_config()).await;

    let request = ChatRequest::new(vec![ChatMessage::user("z".repeat(3_000))])
        .with_max_output_tokens(500);
    let err = harness.service.handle_chat(request).await.unwrap_err();

    assert!(matches!(err, AnalysisError::InvalidInput(ref msg) if msg.contains("context window")));
    assert_eq!(harness.provider.calls(), 0);
}

#[tokio::test]
async fn test_document_truncated_to_fit_model_context() {
    let provider = ScriptedProvider::new()
        .then_text("Summary of the bid")
        .with_limits(ModelLimits {
            max_output_tokens: 4_000,
            context_window: 8_192,
        });
    let config = AnalyzerConfig::builder().retry(RetryPolicy::none()).build();
    let harness = Harness::new(provider, config).await;

    let request = ChatRequest::new(vec![
        ChatMessage::user("Please analyze the attached bid document."),
        ChatMessage::user("d".repeat(30_000)),
    ]);
    let outcome = harness.service.handle_chat(request).await.unwrap();

    assert!(outcome.truncated);
    let sent = &harness.provider.requests()[0];
    assert_eq!(sent.messages[0].content, "Please analyze the attached bid document.");
    assert!(sent.messages[1].content.contains("10000 characters omitted"));

    let input_tokens = estimate_tokens(serialized_len(&sent.messages), 4);
    assert!(input_tokens + u64::from(sent.max_output_tokens) <= 8_192);
}

#[tokio::test]
async fn test_defaults_applied() {
    let harness = Harness::new(ScriptedProvider::new().then_text("ok"), fast_config()).await;

    let request = ChatRequest::new(vec![ChatMessage::user("hello")])
        .with_temperature(0.2)
        .with_caller_id("ana");
    harness.service.handle_chat(request).await.unwrap();

    let sent = &harness.provider.requests()[0];
    assert_eq!(sent.model, "gpt-4");
    assert_eq!(sent.max_output_tokens, 2000);
    assert_eq!(sent.temperature, Some(0.2));

    let db = harness.db.clone();
    harness.drained_history_count().await;
    let stored = history::list_recent(db.pool(), 1, 0).await.unwrap();
    assert_eq!(stored[0].caller_id, "ana");
}

#[tokio::test]
async fn test_closed_history_writer_does_not_fail_request() {
    let db = test_db().await;
    let (writer, worker) = HistoryWriter::spawn(db.clone(), 1);
    worker.drain(Duration::from_secs(5)).await;

    let service = AnalysisService::new(Arc::new(EchoProvider::new()), fast_config(), writer);
    let outcome = service.handle_chat(report_request()).await.unwrap();

    assert_eq!(outcome.content, "Analyze this report: ...");
    assert_eq!(history::count_history(db.pool()).await.unwrap(), 0);
}
