//! Retry policy for API requests with status classification.

use log::{debug, warn};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default multiplier, in seconds, for the delay between attempts.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.0;

/// Upper bound on a single backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

/// How the delay grows between consecutive retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// `factor * n` for the n-th retry.
    #[default]
    Linear,
    /// `factor * 2^(n-1)` for the n-th retry.
    Exponential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub backoff: Backoff,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            backoff: Backoff::Linear,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let multiplier = match self.backoff {
            Backoff::Linear => retry as f64,
            Backoff::Exponential => 2f64.powi(retry.saturating_sub(1).min(30) as i32),
        };
        let secs = self.backoff_factor * multiplier;
        if !secs.is_finite() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or `max_retries + 1` attempts have been made. The last error is
    /// returned unchanged.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_retries + 1;
        let mut retry = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if retry > 0 {
                        debug!("{}: succeeded after {} retries", operation_name, retry);
                    }
                    return Ok(result);
                }
                Err(e) if !e.is_retryable() => {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }
                Err(e) if retry >= self.max_retries => {
                    debug!(
                        "{}: giving up after {} attempts: {}",
                        operation_name, attempts, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    retry += 1;
                    let delay = self.delay_for(retry);
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                        operation_name,
                        retry,
                        attempts,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Statuses that indicate a temporary condition on the server side.
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Turns a non-success status and its body into the matching error kind.
pub fn classify_status(status: StatusCode, body: &str) -> Error {
    let message = error_message(status, body);
    if is_retryable_status(status) {
        Error::Transient {
            status: Some(status),
            message,
            source: None,
        }
    } else {
        Error::Remote { status, message }
    }
}

/// Pulls a readable message out of an error body.
/// Prefers a structured `error`/`message`/`detail` field over raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(serde_json::Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
