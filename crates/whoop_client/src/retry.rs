use std::time::Duration;

/// Exponential backoff with a little jitter.
///
/// Attempt `n` (1-based) waits `base_delay * 2^(n-1)` plus up to 10% jitter,
/// so the default policy sleeps roughly 1s, 2s, 4s.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay * (1u32 << attempt.saturating_sub(1).min(16));
        let jitter_cap = (exp.as_millis() / 10) as u64;
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rand::random_range(0..=jitter_cap)
        };
        exp + Duration::from_millis(jitter)
    }

    /// Run `f` until it succeeds, returns an error `should_retry` rejects,
    /// or the retry budget is spent. The last error is returned as is.
    pub async fn retry_when<F, Fut, T, E, P>(&self, mut f: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    let delay = self.delay_for(attempt);
                    tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
