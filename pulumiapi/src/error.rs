use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the Pulumi service when a request fails.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{status_code} API error: {message}")]
    ErrorResponse { status_code: u16, message: String },

    #[error("failed to parse response body: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Status code of the service error, if this error came from the service.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::ErrorResponse { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
