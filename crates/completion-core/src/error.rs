//! Error types for provider calls.

use thiserror::Error;

/// Errors that can occur while calling a completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider is misconfigured (missing key, bad URL, client build failure).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the provider or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered but the body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider is temporarily unavailable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
