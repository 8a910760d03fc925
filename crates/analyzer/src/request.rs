//! Request and outcome types for the analysis handler.

use std::time::Duration;

use completion_core::ChatMessage;

/// Caller recorded in history when the request does not name one.
pub const DEFAULT_CALLER_ID: &str = "anonimo";

/// An analysis request as received from the HTTP surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Ordered conversation; must contain a non-blank user message.
    pub messages: Vec<ChatMessage>,
    /// Requested model, or the configured default.
    pub model: Option<String>,
    /// Requested output budget, or the configured default.
    pub max_output_tokens: Option<u32>,
    /// Requested sampling temperature; honoured only where the model accepts one.
    pub temperature: Option<f32>,
    /// Caller label stored with the history record.
    pub caller_id: Option<String>,
}

impl ChatRequest {
    /// Create a request with only messages set.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            max_output_tokens: None,
            temperature: None,
            caller_id: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Caller label, falling back to [`DEFAULT_CALLER_ID`] when absent or blank.
    pub fn caller(&self) -> &str {
        self.caller_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CALLER_ID)
    }
}

/// Result of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    /// Generated analysis, including the truncation caveat when one was added.
    pub content: String,
    /// Wall time spent in the handler.
    pub elapsed: Duration,
    /// Empty-response retries performed before the final attempt.
    pub retries: u32,
    /// Whether the input was cut to fit the size budget.
    pub truncated: bool,
    /// Model the request was sent to.
    pub model: String,
    /// Finish reason reported by the provider.
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_fallback() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]);
        assert_eq!(request.caller(), "anonimo");

        let request = request.with_caller_id("   ");
        assert_eq!(request.caller(), "anonimo");

        let request = ChatRequest::new(vec![]).with_caller_id(" maria ");
        assert_eq!(request.caller(), "maria");
    }
}
