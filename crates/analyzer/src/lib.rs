//! Document analysis request handling.
//!
//! [`AnalysisService`] sits between the HTTP surface and a
//! [`CompletionProvider`](completion_core::CompletionProvider):
//!
//! 1. Clamp the output budget and size the prompt budget from the model limits
//! 2. Validate the message list and cut oversized input to fit ([`prompt`])
//! 3. Call the provider, re-issuing the call while it returns empty text
//! 4. Queue the exchange on the [`HistoryWriter`] without waiting for it
//!
//! History listing and per-caller settings live in [`history`] and
//! [`settings`]; they only need a [`Database`](database::Database), so they
//! work even when no provider is configured.

pub mod config;
pub mod error;
pub mod history;
pub mod history_writer;
pub mod prompt;
pub mod request;
pub mod service;
pub mod settings;

pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{AnalysisError, Result};
pub use history::HistoryPage;
pub use history_writer::{HistoryWorker, HistoryWriter};
pub use request::{ChatOutcome, ChatRequest, DEFAULT_CALLER_ID};
pub use service::AnalysisService;
pub use settings::SettingsView;

// Re-export for convenience
pub use database::SettingsUpdate;
