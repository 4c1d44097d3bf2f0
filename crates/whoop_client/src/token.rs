//! Bearer token supply.
//!
//! Acquiring and refreshing tokens through the OAuth flow happens elsewhere;
//! this module only hands an already-issued token to the HTTP client.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::Deserialize;

use crate::WhoopError;

/// Tokens expiring within this margin are treated as already expired.
const EXPIRY_MARGIN_MINUTES: i64 = 5;

#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    async fn access_token(&self) -> Result<SecretString, WhoopError>;
}

#[derive(Clone, Debug)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<SecretString, WhoopError> {
        Ok(self.token.clone())
    }
}

/// Token document persisted by the authorization flow.
#[derive(Deserialize)]
struct StoredTokens {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Reads the persisted token document on every call so a token refreshed by
/// another process is picked up without restarting.
#[derive(Clone, Debug)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<StoredTokens, WhoopError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            WhoopError::Auth(format!(
                "tokens not found at {} (authenticate first): {e}",
                self.path.display()
            ))
        })?;
        serde_json::from_slice(&raw).map_err(|e| {
            WhoopError::Auth(format!("failed to parse {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl TokenProvider for TokenFile {
    async fn access_token(&self) -> Result<SecretString, WhoopError> {
        let tokens = self.load().await?;
        if Utc::now() + Duration::minutes(EXPIRY_MARGIN_MINUTES) >= tokens.expires_at {
            return Err(WhoopError::Auth(format!(
                "access token expired at {}; re-authenticate to refresh it",
                tokens.expires_at
            )));
        }
        if tokens.access_token.is_empty() {
            return Err(WhoopError::Auth("empty access token".into()));
        }
        Ok(SecretString::new(tokens.access_token.into()))
    }
}
