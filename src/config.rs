//! Client configuration and the transport factory built from it.

use log::{debug, warn};
use reqwest::{Client, Url};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::retry::{
    Backoff, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_RETRIES, RetryPolicy,
};

/// Public production host of the sumo statistics API.
pub const DEFAULT_BASE_URL: &str = "https://sumo-api.com/api";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Version string baked in by the build script.
pub const VERSION: &str = env!("SUMOAPI_VERSION");

/// Everything needed to build a [`crate::SumoClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub enable_http2: bool,
    pub max_retries: u32,
    /// Seconds; multiplied by the retry number (or its power of two).
    pub retry_backoff_factor: f64,
    pub backoff: Backoff,
    pub max_backoff: Duration,
    /// Certificate validation. Turning it off is an explicit opt-in.
    pub verify_ssl: bool,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            enable_http2: true,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_factor: DEFAULT_BACKOFF_FACTOR,
            backoff: Backoff::Linear,
            max_backoff: DEFAULT_MAX_BACKOFF,
            verify_ssl: true,
            user_agent: format!("sumoapi/{}", VERSION),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_http2(mut self, enabled: bool) -> Self {
        self.enable_http2 = enabled;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff_factor(mut self, factor: f64) -> Self {
        self.retry_backoff_factor = factor;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Disables certificate validation. Only meant for test deployments.
    pub fn danger_disable_ssl_verification(mut self) -> Self {
        self.verify_ssl = false;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL without trailing slashes.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.normalized_base_url())
            .map_err(|e| Error::config(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported URL scheme '{}' in base URL",
                url.scheme()
            )));
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(Error::config("timeouts must be greater than zero"));
        }
        if !self.retry_backoff_factor.is_finite() || self.retry_backoff_factor < 0.0 {
            return Err(Error::config(format!(
                "retry backoff factor must be a non-negative number, got {}",
                self.retry_backoff_factor
            )));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_factor: self.retry_backoff_factor,
            backoff: self.backoff,
            max_backoff: self.max_backoff,
        }
    }

    /// Builds the pooled transport shared by every request of one client.
    pub fn build_transport(&self) -> Result<Client> {
        self.validate()?;

        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout);

        if !self.enable_http2 {
            builder = builder.http1_only();
        }

        if !self.verify_ssl {
            warn!(
                "TLS certificate verification is disabled for {}",
                self.normalized_base_url()
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        debug!(
            "Building HTTP transport (http2: {}, connect timeout: {:?}, read timeout: {:?})",
            self.enable_http2, self.connect_timeout, self.read_timeout
        );

        builder.build().map_err(|e| Error::Config {
            message: format!("failed to build HTTP transport: {}", e),
            source: Some(e),
        })
    }
}
