//! Error types for the recipe generator client.

use thiserror::Error;

use pantry_core::GenerationError;

/// Errors that can occur when talking to the Messages API.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API key cannot be sent as a header.
    #[error("invalid API key format")]
    InvalidApiKey,

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response did not contain the forced tool call.
    #[error("response did not call {0}")]
    MissingToolCall(&'static str),
}

impl From<GeneratorError> for GenerationError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Parse(_) | GeneratorError::MissingToolCall(_) => {
                Self::InvalidOutput(err.to_string())
            }
            other => Self::Provider(other.to_string()),
        }
    }
}

/// API error response.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_error_display() {
        let err = GeneratorError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = GeneratorError::Api {
            error_type: "overloaded_error".to_string(),
            message: "Overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (overloaded_error): Overloaded");
    }

    #[test]
    fn test_output_problems_map_to_invalid_output() {
        assert!(matches!(
            GenerationError::from(GeneratorError::MissingToolCall("save_recipes")),
            GenerationError::InvalidOutput(_)
        ));
        assert!(matches!(
            GenerationError::from(GeneratorError::RateLimited(5)),
            GenerationError::Provider(_)
        ));
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "type": "error",
            "error": {
                "type": "invalid_request_error",
                "message": "max_tokens is too large"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error_type, "error");
        assert_eq!(response.error.error_type, "invalid_request_error");
        assert_eq!(response.error.message, "max_tokens is too large");
    }
}
