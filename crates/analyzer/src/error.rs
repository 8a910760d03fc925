//! Error types for the analysis pipeline.

use completion_core::ProviderError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling analysis requests.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request can be fixed by the caller.
    #[error("{0}")]
    InvalidInput(String),

    /// The provider call failed (transport, API status, bad body, timeout).
    #[error("upstream failure: {0}")]
    UpstreamFailure(#[from] ProviderError),

    /// The provider kept returning no usable text.
    #[error("empty response from provider after {attempts} attempts")]
    EmptyUpstreamResponse { attempts: u32 },

    /// A store read or write that the caller waits on failed.
    #[error("storage error: {0}")]
    Storage(DatabaseError),
}

impl AnalysisError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(message.into())
    }
}

impl From<DatabaseError> for AnalysisError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Invalid(validation) => AnalysisError::InvalidInput(validation.to_string()),
            other => AnalysisError::Storage(other),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;
    use database::ValidationError;

    #[test]
    fn test_validation_maps_to_invalid_input() {
        let err: AnalysisError = DatabaseError::Invalid(ValidationError::Empty("model".into())).into();
        match err {
            AnalysisError::InvalidInput(msg) => assert_eq!(msg, "model cannot be empty"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AnalysisError::invalid("no messages").to_string(),
            "no messages"
        );
        assert_eq!(
            AnalysisError::EmptyUpstreamResponse { attempts: 3 }.to_string(),
            "empty response from provider after 3 attempts"
        );
        assert_eq!(
            AnalysisError::from(ProviderError::Timeout).to_string(),
            "upstream failure: request timed out"
        );
    }
}
