use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::WhoopError;
use crate::token::{StaticToken, TokenFile, TokenProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.prod.whoop.com/developer/v2";
pub const DEFAULT_TOKEN_FILE: &str = "tokens.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Where the bearer token comes from.
#[derive(Clone, Debug)]
pub enum TokenSource {
    Static(SecretString),
    File(PathBuf),
}

/// Process configuration, read once at startup and passed to constructors.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub token: TokenSource,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, WhoopError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, WhoopError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut lookup = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let token = match lookup("WHOOP_ACCESS_TOKEN") {
            Some(t) => TokenSource::Static(SecretString::new(t.into())),
            None => TokenSource::File(
                lookup("WHOOP_TOKEN_FILE")
                    .unwrap_or_else(|| DEFAULT_TOKEN_FILE.into())
                    .into(),
            ),
        };
        let base_url = lookup("WHOOP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout_secs = parse_or(
            "WHOOP_HTTP_TIMEOUT_SECS",
            lookup("WHOOP_HTTP_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let max_retries = parse_or(
            "WHOOP_MAX_RETRIES",
            lookup("WHOOP_MAX_RETRIES"),
            DEFAULT_MAX_RETRIES,
        )?;

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
        })
    }

    pub fn token_provider(&self) -> Arc<dyn TokenProvider> {
        match &self.token {
            TokenSource::Static(t) => Arc::new(StaticToken::new(t.clone())),
            TokenSource::File(p) => Arc::new(TokenFile::new(p.clone())),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, WhoopError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| WhoopError::Config(format!("{key} must be a non-negative integer, got {v:?}"))),
    }
}
