//! HTTP client implementation for the WHOOP developer API.
//!
//! This module provides a reqwest-based implementation of the [`WhoopClient`](crate::WhoopClient) trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::retry::RetryPolicy;
use crate::token::TokenProvider;
use crate::{WhoopClient, WhoopError};

/// Client for the WHOOP API using reqwest.
#[derive(Clone)]
pub struct ReqwestWhoopClient {
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ReqwestWhoopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestWhoopClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ReqwestWhoopClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - API root including the version prefix (e.g. "https://api.prod.whoop.com/developer/v2")
    /// * `tokens` - Source of the bearer token, consulted for every request
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self, WhoopError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            client,
            retry: RetryPolicy::default(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WhoopError> {
        let client = Self::new(&config.base_url, config.token_provider(), config.timeout)?;
        Ok(client.with_retry_policy(RetryPolicy {
            max_retries: config.max_retries,
            ..RetryPolicy::default()
        }))
    }

    /// Replace the policy used for rate-limited (HTTP 429) responses.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Perform one authenticated GET without retrying.
    async fn get_once(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, WhoopError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}{}", self.base_url, path);
        metrics::counter!("whoop_client_requests_total", "path" => path.to_string()).increment(1);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        metrics::counter!(
            "whoop_client_responses_total",
            "class" => status_class(status)
        )
        .increment(1);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WhoopError::RateLimited(path.to_string()));
        }
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.bytes().await?.to_vec())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> WhoopError {
        let status = resp.status().as_u16();
        let path = resp.url().path().to_string();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        tracing::debug!(status, %path, "WHOOP API error response");
        WhoopError::from_status(status, body_snippet)
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "2xx",
        404 => "404",
        429 => "429",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

#[async_trait]
impl WhoopClient for ReqwestWhoopClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, WhoopError> {
        self.retry
            .retry_when(
                || self.get_once(path, query),
                |e| {
                    let retry = matches!(e, WhoopError::RateLimited(_));
                    if retry {
                        tracing::warn!(path, "rate limited by WHOOP API, backing off");
                        metrics::counter!("whoop_client_retries_total").increment(1);
                    }
                    retry
                },
            )
            .await
    }
}
