//! OpenAiProvider implementation using the OpenAI HTTP API.

use completion_core::{
    async_trait, ChatMessage, Completion, CompletionProvider, CompletionRequest, ModelLimits,
    ProviderError, Role, Usage,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ReasoningOptions, ResponsesRequest,
    ResponsesResponse, TextOptions, WireMessage,
};
use crate::config::OpenAiConfig;
use crate::profile::{ApiKind, ModelProfile, TokenParam};

/// A completion provider backed by the OpenAI API.
///
/// The endpoint and parameter shape for each call are chosen from the
/// [`ModelProfile`] of the requested model.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "OpenAiProvider initialized with api_url: {}, timeout: {}s",
            config.api_url,
            config.timeout.as_secs()
        );

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn build_chat_request(
        &self,
        request: &CompletionRequest,
        profile: &ModelProfile,
    ) -> ChatCompletionRequest {
        let (max_tokens, max_completion_tokens) = match profile.token_param {
            TokenParam::MaxCompletionTokens => (None, Some(request.max_output_tokens)),
            TokenParam::MaxTokens | TokenParam::MaxOutputTokens => {
                (Some(request.max_output_tokens), None)
            }
        };

        ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(to_wire).collect(),
            max_tokens,
            max_completion_tokens,
            temperature: profile
                .resolve_temperature(request.temperature, self.config.default_temperature),
        }
    }

    fn build_responses_request(
        &self,
        request: &CompletionRequest,
        profile: &ModelProfile,
    ) -> ResponsesRequest {
        let instructions = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        ResponsesRequest {
            model: request.model.clone(),
            instructions: if instructions.is_empty() {
                None
            } else {
                Some(instructions)
            },
            input: request
                .messages
                .iter()
                .filter(|m| m.role != Role::System)
                .map(to_wire)
                .collect(),
            max_output_tokens: request.max_output_tokens,
            temperature: profile
                .resolve_temperature(request.temperature, self.config.default_temperature),
            reasoning: profile.reasoning_effort.map(|effort| ReasoningOptions {
                effort: effort.to_string(),
            }),
            text: profile.verbosity.map(|verbosity| TextOptions {
                verbosity: verbosity.to_string(),
            }),
        }
    }

    /// POST a JSON body and decode the JSON answer, mapping failures.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.describe(),
                Err(_) => error_text,
            };

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn chat_completion(
        &self,
        request: &CompletionRequest,
        profile: &ModelProfile,
    ) -> Result<Completion, ProviderError> {
        let body = self.build_chat_request(request, profile);
        debug!(
            model = %body.model,
            messages = body.messages.len(),
            "Sending Chat Completions request"
        );

        let completion: ChatCompletionResponse =
            self.post_json("/v1/chat/completions", &body).await?;

        let Some(choice) = completion.choices.into_iter().next() else {
            warn!(id = %completion.id, "Chat Completions response has no choices");
            return Ok(Completion::empty());
        };

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: completion.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn responses(
        &self,
        request: &CompletionRequest,
        profile: &ModelProfile,
    ) -> Result<Completion, ProviderError> {
        let body = self.build_responses_request(request, profile);
        debug!(
            model = %body.model,
            input = body.input.len(),
            "Sending Responses request"
        );

        let response: ResponsesResponse = self.post_json("/v1/responses", &body).await?;

        let finish_reason = match response.status.as_deref() {
            Some("incomplete") => response
                .incomplete_details
                .as_ref()
                .and_then(|d| d.reason.clone())
                .or_else(|| Some("incomplete".to_string())),
            Some("completed") => Some("stop".to_string()),
            other => other.map(str::to_string),
        };

        Ok(Completion {
            text: response.output_text(),
            finish_reason,
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let profile = ModelProfile::for_model(&request.model);
        debug!(
            model = %request.model,
            family = profile.family,
            max_output_tokens = request.max_output_tokens,
            "Dispatching completion"
        );

        let completion = match profile.api {
            ApiKind::ChatCompletions => self.chat_completion(request, &profile).await?,
            ApiKind::Responses => self.responses(request, &profile).await?,
        };

        // Log usage if available
        if let Some(usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }

    fn limits(&self, model: &str) -> ModelLimits {
        ModelProfile::for_model(model).limits
    }

    fn name(&self) -> &str {
        "OpenAiProvider"
    }
}

fn to_wire(message: &ChatMessage) -> WireMessage {
    WireMessage {
        role: message.role.as_str().to_string(),
        content: message.content.clone(),
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(format!("Failed to send request: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        let config = OpenAiConfig::builder().api_key("test-key").build();
        OpenAiProvider::new(config).unwrap()
    }

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system("You are a bid analyst."),
                ChatMessage::user("Analyze this report: ..."),
            ],
            max_output_tokens: 500,
            temperature: Some(0.2),
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = OpenAiProvider::new(OpenAiConfig::default());
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().name(), "OpenAiProvider");
    }

    #[test]
    fn test_legacy_chat_request_uses_max_tokens() {
        let provider = provider();
        let req = request("gpt-4");
        let body = provider.build_chat_request(&req, &ModelProfile::for_model("gpt-4"));

        assert_eq!(body.max_tokens, Some(500));
        assert_eq!(body.max_completion_tokens, None);
        assert_eq!(body.temperature, Some(0.2));
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
    }

    #[test]
    fn test_reasoning_chat_request_omits_temperature() {
        let provider = provider();
        let req = request("o3-mini");
        let body = provider.build_chat_request(&req, &ModelProfile::for_model("o3-mini"));

        assert_eq!(body.max_tokens, None);
        assert_eq!(body.max_completion_tokens, Some(500));
        assert_eq!(body.temperature, None);
    }

    #[test]
    fn test_responses_request_splits_instructions() {
        let provider = provider();
        let req = request("gpt-5");
        let body = provider.build_responses_request(&req, &ModelProfile::for_model("gpt-5"));

        assert_eq!(body.instructions.as_deref(), Some("You are a bid analyst."));
        assert_eq!(body.input.len(), 1);
        assert_eq!(body.input[0].role, "user");
        assert_eq!(body.max_output_tokens, 500);
        assert!(body.temperature.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["reasoning"]["effort"], "low");
        assert_eq!(json["text"]["verbosity"], "high");
    }

    #[test]
    fn test_limits_follow_profile() {
        let provider = provider();
        assert_eq!(provider.limits("gpt-4").max_output_tokens, 4_000);
        assert_eq!(provider.limits("gpt-5").max_output_tokens, 128_000);
    }
}
