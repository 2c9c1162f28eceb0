//! Error handling for the MicroCrop weather oracle
//!
//! The taxonomy mirrors how failures are recovered: discovery failures are
//! degraded to empty results at the call site, observation failures become
//! fallback readings, while ledger and validation failures always propagate.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Weather API error: {0}")]
    WeatherApi(String),

    #[error("No observation data available for station {0}")]
    NoObservations(String),

    // Money-moving failures are never swallowed
    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap a shared-crate validation message for a named input.
    pub fn validation(field: &str, message: &'static str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias for the oracle service
pub type AppResult<T> = Result<T, AppError>;
