//! Per-model-family adapter profiles.
//!
//! OpenAI model families disagree on the endpoint, the name of the output
//! budget parameter and whether a temperature may be sent. The profile for a
//! model is picked by prefix; unknown models fall back to the legacy
//! Chat Completions behaviour.

use completion_core::ModelLimits;

/// Which OpenAI endpoint serves the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    /// `POST /v1/chat/completions`
    ChatCompletions,
    /// `POST /v1/responses`
    Responses,
}

/// Name of the output-budget parameter the endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenParam {
    MaxTokens,
    MaxCompletionTokens,
    MaxOutputTokens,
}

/// How a model treats the sampling temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperaturePolicy {
    /// Temperature must not be sent; the provider uses its own fixed value.
    Omit,
    /// Temperature is accepted; requests may override the configured default.
    Tunable,
}

/// Adapter settings for one model family.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    /// Family label used in logs.
    pub family: &'static str,
    pub api: ApiKind,
    pub token_param: TokenParam,
    pub temperature: TemperaturePolicy,
    pub limits: ModelLimits,
    /// Reasoning effort for reasoning-capable Responses models.
    pub reasoning_effort: Option<&'static str>,
    /// Output verbosity for Responses models.
    pub verbosity: Option<&'static str>,
}

impl ModelProfile {
    /// Pick the profile for a model identifier.
    pub fn for_model(model: &str) -> Self {
        let model = model.trim().to_ascii_lowercase();

        if model.starts_with("gpt-5") {
            return Self {
                family: "gpt-5",
                api: ApiKind::Responses,
                token_param: TokenParam::MaxOutputTokens,
                temperature: TemperaturePolicy::Omit,
                limits: ModelLimits {
                    max_output_tokens: 128_000,
                    context_window: 400_000,
                },
                reasoning_effort: Some("low"),
                verbosity: Some("high"),
            };
        }

        if model.starts_with("o1") || model.starts_with("o3") || model.starts_with("o4") {
            return Self {
                family: "o-series",
                api: ApiKind::ChatCompletions,
                token_param: TokenParam::MaxCompletionTokens,
                temperature: TemperaturePolicy::Omit,
                limits: ModelLimits {
                    max_output_tokens: 100_000,
                    context_window: 200_000,
                },
                reasoning_effort: None,
                verbosity: None,
            };
        }

        if model.starts_with("gpt-4o") || model.starts_with("gpt-4.1") {
            return Self {
                family: "gpt-4o",
                api: ApiKind::ChatCompletions,
                token_param: TokenParam::MaxCompletionTokens,
                temperature: TemperaturePolicy::Tunable,
                limits: ModelLimits {
                    max_output_tokens: 16_384,
                    context_window: 128_000,
                },
                reasoning_effort: None,
                verbosity: None,
            };
        }

        if model.starts_with("gpt-4") {
            return Self {
                family: "gpt-4",
                api: ApiKind::ChatCompletions,
                token_param: TokenParam::MaxTokens,
                temperature: TemperaturePolicy::Tunable,
                limits: ModelLimits {
                    max_output_tokens: 4_000,
                    context_window: 8_192,
                },
                reasoning_effort: None,
                verbosity: None,
            };
        }

        Self {
            family: "legacy",
            api: ApiKind::ChatCompletions,
            token_param: TokenParam::MaxTokens,
            temperature: TemperaturePolicy::Tunable,
            limits: ModelLimits::default(),
            reasoning_effort: None,
            verbosity: None,
        }
    }

    /// Temperature to send for a request, if any.
    ///
    /// Requested values are clamped to the `[0, 2]` range the API accepts.
    pub fn resolve_temperature(&self, requested: Option<f32>, default: f32) -> Option<f32> {
        match self.temperature {
            TemperaturePolicy::Omit => None,
            TemperaturePolicy::Tunable => {
                let value = requested.filter(|t| t.is_finite()).unwrap_or(default);
                Some(value.clamp(0.0, 2.0))
            }
        }
    }
}
