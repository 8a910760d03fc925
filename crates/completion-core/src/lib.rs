//! Core trait and types for completion providers.
//!
//! This crate provides the shared interface between the analysis handler and
//! the LLM backends it talks to. It defines:
//!
//! - [`CompletionProvider`] - The trait every provider adapter implements
//! - [`ChatMessage`] / [`CompletionRequest`] / [`Completion`] - Wire-neutral message types
//! - [`ModelLimits`] - Per-model output ceiling and context window
//! - [`ProviderError`] - Error types for provider calls
//! - [`retry`] - Bounded retry combinator used around provider calls
//!
//! # Example
//!
//! ```rust
//! use completion_core::{
//!     async_trait, Completion, CompletionProvider, CompletionRequest, ModelLimits, ProviderError,
//! };
//!
//! struct StaticProvider;
//!
//! #[async_trait]
//! impl CompletionProvider for StaticProvider {
//!     async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, ProviderError> {
//!         Ok(Completion::text("Summary: all good"))
//!     }
//!
//!     fn limits(&self, _model: &str) -> ModelLimits {
//!         ModelLimits::default()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "StaticProvider"
//!     }
//! }
//! ```

mod error;
mod message;
mod prompt;
pub mod retry;
mod trait_def;

pub use error::ProviderError;
pub use message::{ChatMessage, Completion, CompletionRequest, ModelLimits, Role, Usage};
pub use prompt::{estimate_tokens, hash_prompt, serialized_len};
pub use retry::{Attempted, RetryPolicy};
pub use trait_def::CompletionProvider;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
