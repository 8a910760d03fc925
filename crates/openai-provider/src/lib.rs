//! OpenAI-based completion provider.
//!
//! This crate provides a [`CompletionProvider`] that talks to the OpenAI HTTP
//! API. Model families differ in which endpoint they use, which token-limit
//! parameter they accept and whether a temperature may be sent; those
//! differences live in [`ModelProfile`] rather than in the caller.
//!
//! # Features
//!
//! - Chat Completions API for GPT-3.5/GPT-4/o-series models
//! - Responses API for GPT-5 models
//! - Per-family output ceilings and context windows via [`CompletionProvider::limits`]
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_provider::{ChatMessage, CompletionProvider, CompletionRequest, OpenAiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::from_env()?;
//!     let request = CompletionRequest {
//!         model: "gpt-4".to_string(),
//!         messages: vec![ChatMessage::user("Analyze this report: ...")],
//!         max_output_tokens: 500,
//!         temperature: None,
//!     };
//!     let completion = provider.complete(&request).await?;
//!     println!("{}", completion.text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod profile;
mod provider;

pub use config::{OpenAiConfig, OpenAiConfigBuilder};
pub use profile::{ApiKind, ModelProfile, TemperaturePolicy, TokenParam};
pub use provider::OpenAiProvider;

// Re-export completion-core types for convenience
pub use completion_core::{
    async_trait, ChatMessage, Completion, CompletionProvider, CompletionRequest, ModelLimits,
    ProviderError, Role,
};
