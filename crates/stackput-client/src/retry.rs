//! Retry policy and backoff schedule.
//!
//! Every exchange runs under one [`Backoff`] drawn from the configured
//! [`RetryPolicy`]. The schedule escalates geometrically from `min_delay`,
//! capped at `max_delay`, and grants at most `max_retries` further attempts.

use std::time::Duration;

/// Parameters of the escalating retry schedule.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub min_delay: Duration,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay for each subsequent retry.
    pub factor: f64,
    /// Number of retries granted after the initial attempt. Zero disables
    /// retrying entirely.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(60),
            factor: 2.0,
            max_retries: 10,
        }
    }
}

impl RetryPolicy {
    /// Start a fresh backoff schedule for one logical exchange.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: self.clone(),
            attempt: 0,
        }
    }
}

/// Escalating delay sequence for one logical exchange.
#[derive(Debug)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Backoff {
    /// The delay to wait before the next retry, or `None` when the retry
    /// budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.policy.max_retries {
            return None;
        }

        let exponent = i32::try_from(self.attempt).unwrap_or(i32::MAX);
        let scaled = self.policy.min_delay.as_secs_f64() * self.policy.factor.powi(exponent);

        let delay = if scaled.is_finite()
            && scaled >= 0.0
            && scaled < self.policy.max_delay.as_secs_f64()
        {
            Duration::from_secs_f64(scaled)
        } else {
            self.policy.max_delay
        };

        self.attempt += 1;
        Some(delay)
    }
}
