//! Client and day-level aggregation for the WHOOP developer API.
//!
//! WHOOP reports physiological data per *cycle* (wake to wake) rather than per
//! calendar day. [`aggregate::get_day_data`] maps a calendar date onto the
//! right cycle and gathers the recovery, sleep and workout records around it.

use async_trait::async_trait;
use thiserror::Error;

pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod http_client;
pub mod models;
pub mod retry;
pub mod token;
pub mod window;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregate::{DayData, DayDataError, get_day_data};
pub use window::{CycleWindows, TimeWindow, parse_whoop_time};

#[derive(Debug, Error)]
pub enum WhoopError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("rate limit exceeded for {0} after retries")]
    RateLimited(String),
    #[error("WHOOP API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
    #[error("background fetch failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl WhoopError {
    /// Classify a non-success status that is not handled by a dedicated variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            404 => WhoopError::NotFound(body),
            401 | 403 => WhoopError::Auth(body),
            _ => WhoopError::Api { status, body },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WhoopError::NotFound(_))
    }
}

/// The one transport capability the aggregation core depends on.
///
/// Implementations attach credentials, report HTTP 404 as
/// [`WhoopError::NotFound`] and absorb rate limiting internally.
#[async_trait]
pub trait WhoopClient: Send + Sync + 'static {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, WhoopError>;
}

#[cfg(test)]
mod tests {
    use super::WhoopError;

    #[test]
    fn from_status_maps_known_codes() {
        assert!(WhoopError::from_status(404, "gone".into()).is_not_found());
        assert!(matches!(
            WhoopError::from_status(401, String::new()),
            WhoopError::Auth(_)
        ));
        assert!(matches!(
            WhoopError::from_status(503, "down".into()),
            WhoopError::Api { status: 503, .. }
        ));
    }

    #[test]
    fn api_error_display_includes_status() {
        let e = WhoopError::from_status(500, "boom".into());
        assert_eq!(e.to_string(), "WHOOP API returned 500: boom");
    }
}
