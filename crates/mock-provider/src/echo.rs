//! Echo provider implementation - echoes the last user message back.

use async_trait::async_trait;
use completion_core::{
    Completion, CompletionProvider, CompletionRequest, ModelLimits, ProviderError, Role,
};

/// A simple provider that echoes the last user message.
///
/// Useful for testing the request flow without any model behind it.
#[derive(Debug, Clone, Default)]
pub struct EchoProvider {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoProvider {
    /// Create a new EchoProvider with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoProvider with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_provider::EchoProvider;
    ///
    /// let provider = EchoProvider::with_prefix("Echo: ");
    /// // Will respond with "Echo: <last user message>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for EchoProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, last_user),
            None => last_user.to_string(),
        };

        Ok(Completion::text(text))
    }

    fn limits(&self, _model: &str) -> ModelLimits {
        ModelLimits::default()
    }

    fn name(&self) -> &str {
        "EchoProvider"
    }
}
