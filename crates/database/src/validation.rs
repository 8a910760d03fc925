//! Input validation for settings fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Numeric value outside the accepted range.
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{} must be between {} and {} (got {})",
                field, min, max, actual
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for model names.
pub const MAX_MODEL_LENGTH: usize = 64;

/// Smallest accepted token or chunk setting.
pub const MIN_TOKEN_SETTING: i64 = 100;

/// Largest accepted token or chunk setting.
pub const MAX_TOKEN_SETTING: i64 = 128_000;

/// Validate a model name length.
pub fn validate_model_length(model: &str) -> Result<(), ValidationError> {
    let model = model.trim();

    if model.is_empty() {
        return Err(ValidationError::Empty("model".to_string()));
    }

    if model.len() > MAX_MODEL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "model".to_string(),
            max: MAX_MODEL_LENGTH,
            actual: model.len(),
        });
    }

    Ok(())
}

/// Validate that a token/chunk setting lies in `[100, 128000]`.
pub fn validate_token_setting(field: &str, value: i64) -> Result<(), ValidationError> {
    if !(MIN_TOKEN_SETTING..=MAX_TOKEN_SETTING).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: MIN_TOKEN_SETTING,
            max: MAX_TOKEN_SETTING,
            actual: value,
        });
    }

    Ok(())
}
