//! The CompletionProvider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::message::{Completion, CompletionRequest, ModelLimits};

/// A backend that turns a chat-style request into generated text.
///
/// Implementations range from the OpenAI HTTP adapter to scripted test
/// doubles. This trait is object-safe and can be used as
/// `Arc<dyn CompletionProvider>`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a single completion call.
    ///
    /// An `Ok` completion with empty text is a valid outcome; callers decide
    /// whether to retry it. Transport and API failures are returned as errors.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;

    /// Output ceiling and context window for `model`.
    fn limits(&self, model: &str) -> ModelLimits;

    /// Get a human-readable name for this provider.
    fn name(&self) -> &str;
}
