//! Mock completion providers for tests.
//!
//! This crate provides mock implementations of the `CompletionProvider` trait:
//! - `EchoProvider` - Echoes the last user message back
//! - `ScriptedProvider` - Replays a fixed sequence of outcomes and counts calls
//! - `DelayedProvider` - Adds per-call latency to another provider
//!
//! For production calls, use the `openai-provider` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_provider::{ChatMessage, CompletionProvider, CompletionRequest, ScriptedProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_provider::ProviderError> {
//!     let provider = ScriptedProvider::new().then_empty().then_text("Summary: ...");
//!
//!     let request = CompletionRequest {
//!         model: "gpt-4".to_string(),
//!         messages: vec![ChatMessage::user("Analyze this report: ...")],
//!         max_output_tokens: 500,
//!         temperature: None,
//!     };
//!
//!     assert!(provider.complete(&request).await?.is_empty());
//!     assert_eq!(provider.complete(&request).await?.text, "Summary: ...");
//!     assert_eq!(provider.calls(), 2);
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod scripted;

// Re-export completion-core types for convenience
pub use completion_core::{
    async_trait, ChatMessage, Completion, CompletionProvider, CompletionRequest, ModelLimits,
    ProviderError, Role,
};

pub use delayed::DelayedProvider;
pub use echo::EchoProvider;
pub use scripted::ScriptedProvider;
