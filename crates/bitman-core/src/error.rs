use thiserror::Error;

use crate::models::FailureKind;

/// Message returned when neither provider has an API key.
pub const NOT_CONFIGURED_MESSAGE: &str = "Add at least one API key in Options.";

/// Application-wide error types for BitMan.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request could not be built or sent.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Provider answered with a non-success status.
    ///
    /// `message` is the provider's `error.message` when the body carries one,
    /// otherwise the raw body.
    #[error("HTTP {status} {status_text}: {message}")]
    ApiError {
        status: u16,
        status_text: String,
        message: String,
    },

    /// Provider failed and its details are deliberately not surfaced.
    #[error("{0}")]
    ProviderError(String),

    /// Provider answered 2xx but the body did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Settings could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller supplied an unusable request (e.g. an empty question).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No provider has an API key.
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Classifies the error for [`ProviderOutcome::Failed`](crate::models::ProviderOutcome).
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_) => {
                FailureKind::Transport
            }
            AppError::ApiError { .. } => FailureKind::Http,
            AppError::ProviderError(_) => FailureKind::Provider,
            AppError::UnexpectedResponse(_) => FailureKind::UnexpectedResponse,
            AppError::SerializationError(_) => FailureKind::Serialization,
            AppError::ConfigError(_) | AppError::NotConfigured => FailureKind::Config,
            AppError::InvalidInput(_) | AppError::Generic(_) => FailureKind::Other,
        }
    }

    /// HTTP status of a failed provider call, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
