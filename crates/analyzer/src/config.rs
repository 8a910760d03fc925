//! Analyzer configuration.

use std::env;
use std::time::Duration;

use completion_core::RetryPolicy;

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Model used when a request does not name one.
    pub default_model: String,
    /// Output budget used when a request does not set one.
    pub default_max_output_tokens: u32,
    /// Largest serialized prompt (chars) sent upstream; larger user messages are truncated.
    pub max_prompt_chars: usize,
    /// Length (chars) a truncated user message is cut to.
    pub truncate_to_chars: usize,
    /// Responses shorter than this after truncation get a caveat appended.
    pub short_response_chars: usize,
    /// Characters per token for input size estimates.
    pub chars_per_token: usize,
    /// Also fit the prompt into the model context window left after the output budget.
    pub enforce_context_window: bool,
    /// Re-issue policy for empty completions.
    pub retry: RetryPolicy,
    /// Capacity of the background history queue.
    pub history_queue_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_model: "gpt-4".to_string(),
            default_max_output_tokens: 2000,
            max_prompt_chars: 50_000,
            truncate_to_chars: 20_000,
            short_response_chars: 500,
            chars_per_token: 4,
            enforce_context_window: true,
            retry: RetryPolicy::default(),
            history_queue_capacity: 256,
        }
    }
}

impl AnalyzerConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `ANALYZER_DEFAULT_MODEL` (default: gpt-4)
    /// - `ANALYZER_DEFAULT_MAX_TOKENS` (default: 2000)
    /// - `ANALYZER_MAX_PROMPT_CHARS` (default: 50000)
    /// - `ANALYZER_TRUNCATE_TO_CHARS` (default: 20000)
    /// - `ANALYZER_SHORT_RESPONSE_CHARS` (default: 500)
    /// - `ANALYZER_CHARS_PER_TOKEN` (default: 4)
    /// - `ANALYZER_ENFORCE_CONTEXT_WINDOW` (default: true)
    /// - `ANALYZER_EMPTY_RETRIES` (default: 2)
    /// - `ANALYZER_RETRY_DELAY_MS` (default: 2000)
    /// - `HISTORY_QUEUE_CAPACITY` (default: 256)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let retry = RetryPolicy::new(
            parse_var("ANALYZER_EMPTY_RETRIES").unwrap_or(defaults.retry.max_retries),
            parse_var("ANALYZER_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.delay),
        );

        let enforce_context_window = env::var("ANALYZER_ENFORCE_CONTEXT_WINDOW")
            .ok()
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(defaults.enforce_context_window);

        Self {
            default_model: env::var("ANALYZER_DEFAULT_MODEL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_model),
            default_max_output_tokens: parse_var("ANALYZER_DEFAULT_MAX_TOKENS")
                .unwrap_or(defaults.default_max_output_tokens),
            max_prompt_chars: parse_var("ANALYZER_MAX_PROMPT_CHARS")
                .unwrap_or(defaults.max_prompt_chars),
            truncate_to_chars: parse_var("ANALYZER_TRUNCATE_TO_CHARS")
                .unwrap_or(defaults.truncate_to_chars),
            short_response_chars: parse_var("ANALYZER_SHORT_RESPONSE_CHARS")
                .unwrap_or(defaults.short_response_chars),
            chars_per_token: parse_var("ANALYZER_CHARS_PER_TOKEN")
                .unwrap_or(defaults.chars_per_token),
            enforce_context_window,
            retry,
            history_queue_capacity: parse_var("HISTORY_QUEUE_CAPACITY")
                .unwrap_or(defaults.history_queue_capacity),
        }
    }

    /// Create a new config builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Builder for AnalyzerConfig.
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    pub fn default_max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.default_max_output_tokens = tokens;
        self
    }

    pub fn max_prompt_chars(mut self, chars: usize) -> Self {
        self.config.max_prompt_chars = chars;
        self
    }

    pub fn truncate_to_chars(mut self, chars: usize) -> Self {
        self.config.truncate_to_chars = chars;
        self
    }

    pub fn short_response_chars(mut self, chars: usize) -> Self {
        self.config.short_response_chars = chars;
        self
    }

    pub fn chars_per_token(mut self, chars: usize) -> Self {
        self.config.chars_per_token = chars;
        self
    }

    pub fn enforce_context_window(mut self, enforce: bool) -> Self {
        self.config.enforce_context_window = enforce;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn history_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.history_queue_capacity = capacity;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}
