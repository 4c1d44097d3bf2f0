//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] whoop_client::WhoopError),

    #[error(transparent)]
    Day(#[from] whoop_client::DayDataError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Hint shown next to authentication failures.
    pub fn hint(&self) -> Option<&'static str> {
        let auth = match self {
            AppError::Api(e) => matches!(e, whoop_client::WhoopError::Auth(_)),
            AppError::Day(e) => matches!(e.source, whoop_client::WhoopError::Auth(_)),
            _ => false,
        };
        auth.then_some("run the WHOOP authorization flow to obtain a fresh token")
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
