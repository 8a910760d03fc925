//! Provider-neutral message, request and response types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a role name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a chat-style request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Whether the content is empty once whitespace is stripped.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A fully resolved call to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Ordered conversation.
    pub messages: Vec<ChatMessage>,
    /// Output budget, already clamped to the model ceiling.
    pub max_output_tokens: u32,
    /// Requested sampling temperature. Adapters may ignore it.
    pub temperature: Option<f32>,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Generated text. May be empty when the provider produced nothing usable.
    pub text: String,
    /// Why generation stopped, if the provider said.
    pub finish_reason: Option<String>,
    /// Token usage, if reported.
    pub usage: Option<Usage>,
}

impl Completion {
    /// A completion carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// An empty completion.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the text is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Output ceiling and context size for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelLimits {
    /// Largest output budget the model accepts.
    pub max_output_tokens: u32,
    /// Total tokens (input + output) the model can attend to.
    pub context_window: u32,
}

impl Default for ModelLimits {
    fn default() -> Self {
        Self {
            max_output_tokens: 4096,
            context_window: 16_385,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);

        let parsed: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(parsed.role, Role::Assistant);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse(" system "), Some(Role::System));
        assert_eq!(Role::parse("tool"), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(ChatMessage::user("  \n\t").is_blank());
        assert!(!ChatMessage::user(" x ").is_blank());
        assert!(Completion::text("   ").is_empty());
        assert!(Completion::empty().is_empty());
        assert!(!Completion::text("Summary").is_empty());
    }
}
