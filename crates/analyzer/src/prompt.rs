//! Prompt validation and size budgeting.
//!
//! Everything here runs before the provider is called. Sizes are measured in
//! characters of the JSON-serialized message list, the same representation
//! that ends up in the history table.

use completion_core::{serialized_len, ChatMessage, ModelLimits, Role};
use tracing::{debug, info};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};

/// Largest serialized prompt, in characters, a request may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBudget {
    pub max_chars: usize,
    /// The model context window, not the configured size limit, sets `max_chars`.
    pub limited_by_context: bool,
}

/// Messages ready to send, plus what preparation did to them.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPrompt {
    pub messages: Vec<ChatMessage>,
    /// Serialized size after truncation.
    pub serialized_chars: usize,
    pub truncated: bool,
}

/// Marker appended to a truncated user message.
pub fn truncation_marker(removed: usize) -> String {
    format!(
        "\n\n[Content truncated: {} characters omitted to fit the processing limit]",
        removed
    )
}

/// Caveat appended to short answers produced from truncated input.
pub const TRUNCATION_CAVEAT: &str = "\n\n---\nNote: the submitted document exceeded the processing limit and was truncated; this analysis may be incomplete.";

/// Clamp the requested output budget to `[1, limits.max_output_tokens]`.
pub fn clamp_output_tokens(requested: u32, limits: &ModelLimits) -> u32 {
    requested.clamp(1, limits.max_output_tokens.max(1))
}

/// Size budget for a call: the configured limit, tightened to what the
/// context window leaves after the output budget when that check is enabled.
///
/// A prompt within the budget satisfies
/// `ceil(chars / chars_per_token) + max_output_tokens <= context_window`.
pub fn prompt_budget(
    max_output_tokens: u32,
    limits: &ModelLimits,
    config: &AnalyzerConfig,
) -> PromptBudget {
    let configured = PromptBudget {
        max_chars: config.max_prompt_chars,
        limited_by_context: false,
    };
    if !config.enforce_context_window {
        return configured;
    }

    let room_tokens = limits.context_window.saturating_sub(max_output_tokens) as usize;
    let context_chars = room_tokens.saturating_mul(config.chars_per_token.max(1));

    if context_chars < configured.max_chars {
        PromptBudget {
            max_chars: context_chars,
            limited_by_context: true,
        }
    } else {
        configured
    }
}

/// Validate the message list and cut it down to `budget`.
///
/// User messages longer than `truncate_to_chars` are cut, longest first
/// (earlier message on ties), until the prompt fits. A prompt that still
/// does not fit is rejected.
pub fn prepare(
    messages: Vec<ChatMessage>,
    budget: PromptBudget,
    config: &AnalyzerConfig,
) -> Result<PreparedPrompt> {
    if messages.is_empty() {
        return Err(AnalysisError::invalid("no messages"));
    }

    if !messages.iter().any(|m| m.role == Role::User && !m.is_blank()) {
        return Err(AnalysisError::invalid("empty user message"));
    }

    let mut messages = messages;
    let mut serialized_chars = serialized_len(&messages);
    let mut truncated = false;

    if serialized_chars > budget.max_chars {
        info!(
            original_chars = serialized_chars,
            limit = budget.max_chars,
            limited_by_context = budget.limited_by_context,
            "Prompt over size limit, truncating user messages"
        );

        let mut candidates: Vec<(usize, usize)> = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role == Role::User)
            .map(|(index, m)| (index, m.content.chars().count()))
            .filter(|(_, chars)| *chars > config.truncate_to_chars)
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (index, _) in candidates {
            if serialized_chars <= budget.max_chars {
                break;
            }
            if let Some(cut) = truncate_chars(&messages[index].content, config.truncate_to_chars) {
                messages[index].content = cut;
                serialized_chars = serialized_len(&messages);
                truncated = true;
            }
        }

        if serialized_chars > budget.max_chars {
            debug!(serialized_chars, limit = budget.max_chars, "Prompt still over limit");
            return Err(if budget.limited_by_context {
                AnalysisError::invalid("prompt exceeds model context window")
            } else {
                AnalysisError::invalid("prompt too long")
            });
        }
    }

    Ok(PreparedPrompt {
        messages,
        serialized_chars,
        truncated,
    })
}

/// Cut `content` to `keep` characters and append the marker.
///
/// Returns `None` when the content already fits.
fn truncate_chars(content: &str, keep: usize) -> Option<String> {
    let total = content.chars().count();
    if total <= keep {
        return None;
    }

    let mut cut: String = content.chars().take(keep).collect();
    cut.push_str(&truncation_marker(total - keep));
    Some(cut)
}

/// Append the truncation caveat when a truncated prompt produced a short answer.
pub fn finalize_content(text: String, truncated: bool, config: &AnalyzerConfig) -> String {
    if truncated && text.chars().count() < config.short_response_chars {
        let mut text = text;
        text.push_str(TRUNCATION_CAVEAT);
        return text;
    }
    text
}
