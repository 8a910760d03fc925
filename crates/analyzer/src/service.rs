//! The analysis request handler.

use std::sync::Arc;
use std::time::Instant;

use completion_core::retry::retry_while;
use completion_core::{
    estimate_tokens, hash_prompt, Completion, CompletionProvider, CompletionRequest,
};
use database::NewHistoryRecord;
use tracing::{debug, error, info, warn};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::history_writer::HistoryWriter;
use crate::prompt::{self, clamp_output_tokens, prompt_budget};
use crate::request::{ChatOutcome, ChatRequest};

/// Validates analysis requests, calls the provider and records the exchange.
///
/// Holds only immutable configuration, the provider handle and the history
/// queue, so one instance is shared across all request tasks.
pub struct AnalysisService {
    provider: Arc<dyn CompletionProvider>,
    config: AnalyzerConfig,
    history: HistoryWriter,
}

impl AnalysisService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: AnalyzerConfig,
        history: HistoryWriter,
    ) -> Self {
        info!(
            provider = provider.name(),
            default_model = %config.default_model,
            "Analysis service ready"
        );
        Self {
            provider,
            config,
            history,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one analysis: validate, budget, call with empty-response retry,
    /// then queue the exchange for history.
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatOutcome> {
        let started = Instant::now();
        let caller_id = request.caller().to_string();
        let model = request
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.config.default_model)
            .to_string();

        let limits = self.provider.limits(&model);
        let max_output_tokens = clamp_output_tokens(
            request
                .max_output_tokens
                .unwrap_or(self.config.default_max_output_tokens),
            &limits,
        );
        let budget = prompt_budget(max_output_tokens, &limits, &self.config);
        let prepared = prompt::prepare(request.messages, budget, &self.config)?;

        let prompt_json = serde_json::to_string(&prepared.messages)
            .map_err(|e| AnalysisError::invalid(format!("messages are not serializable: {}", e)))?;
        let fingerprint = hash_prompt(&prompt_json);

        info!(
            caller_id = %caller_id,
            model = %model,
            prompt = &fingerprint[..12],
            prompt_chars = prepared.serialized_chars,
            prompt_tokens = estimate_tokens(prepared.serialized_chars, self.config.chars_per_token),
            max_output_tokens,
            truncated = prepared.truncated,
            "Processing analysis request"
        );

        let completion_request = CompletionRequest {
            model: model.clone(),
            messages: prepared.messages,
            max_output_tokens,
            temperature: request.temperature,
        };

        let attempted = retry_while(
            &self.config.retry,
            || self.provider.complete(&completion_request),
            |completion: &Completion| completion.is_empty(),
        )
        .await
        .map_err(|e| {
            error!(prompt = &fingerprint[..12], "Provider call failed: {}", e);
            AnalysisError::UpstreamFailure(e)
        })?;

        if attempted.value.is_empty() {
            warn!(
                prompt = &fingerprint[..12],
                attempts = attempted.attempts(),
                "Provider returned no text"
            );
            return Err(AnalysisError::EmptyUpstreamResponse {
                attempts: attempted.attempts(),
            });
        }

        let retries = attempted.retries;
        let completion = attempted.value;
        let content = prompt::finalize_content(completion.text, prepared.truncated, &self.config);

        self.history.enqueue(NewHistoryRecord {
            caller_id,
            prompt: prompt_json,
            response: content.clone(),
        });

        let elapsed = started.elapsed();
        debug!(
            prompt = &fingerprint[..12],
            response_chars = content.chars().count(),
            retries,
            elapsed_ms = elapsed.as_millis() as u64,
            "Analysis complete"
        );

        Ok(ChatOutcome {
            content,
            elapsed,
            retries,
            truncated: prepared.truncated,
            model,
            finish_reason: completion.finish_reason,
        })
    }
}
