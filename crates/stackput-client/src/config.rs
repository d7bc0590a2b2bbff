//! Upload client configuration.
//!
//! Defaults match the upstream protocol expectations (60 second per-request
//! deadline, 200 ms minimum backoff); every knob can also be driven by
//! environment variables for deployment-time tuning.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Configuration for an [`Uploader`](crate::Uploader).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    /// Deadline for a single exchange attempt. A timed-out attempt is
    /// retryable like any other failure.
    pub timeout: Duration,
    /// Backoff schedule applied per exchange.
    pub retry: RetryPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(timeout) = env_millis("STACKPUT_TIMEOUT_MS") {
            config.timeout = timeout;
        }
        if let Some(delay) = env_millis("STACKPUT_RETRY_MIN_DELAY_MS") {
            config.retry.min_delay = delay;
        }
        if let Some(delay) = env_millis("STACKPUT_RETRY_MAX_DELAY_MS") {
            config.retry.max_delay = delay;
        }
        if let Ok(v) = std::env::var("STACKPUT_RETRY_MAX_RETRIES") {
            if let Ok(n) = v.parse() {
                config.retry.max_retries = n;
            }
        }

        config
    }
}

/// Read a millisecond duration from an environment variable.
fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_millis)
}
