// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-request retry for transient network failures.
//!
//! Only failures classified as [`RetryAction::Retry`] are retried. Fault
//! payloads and decode errors are never retried: the whole run fails and the
//! user re-runs it.

use std::future::Future;
use std::time::Duration;

use rand::Rng as _;

/// What to do with a failed API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    Retry,
    Abort,
}

/// Backoff for requests to the Strava API. Off unless `max_retries` is set.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_secs: 1,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn none() -> Self {
        Self::default()
    }

    /// Wait before the `retry`th retry (first retry is 0). Doubles from the
    /// base up to the cap, plus up to one base delay of random spread so the
    /// page workers don't all hit the API again at the same instant.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let doubled = 2u64
            .checked_pow(retry)
            .and_then(|factor| self.base_delay_secs.checked_mul(factor))
            .unwrap_or(u64::MAX);
        let backoff = Duration::from_secs(doubled.min(self.max_delay_secs));

        let spread_ms = self.base_delay_secs.saturating_mul(1000);
        if spread_ms == 0 {
            return backoff;
        }
        backoff + Duration::from_millis(rand::thread_rng().gen_range(0..spread_ms))
    }
}

/// Run `operation` until it succeeds, `classifier` gives up on its error, or
/// `max_retries` retries have been spent. The last error is returned.
pub async fn retry_with_backoff<F, Fut, T, E, C>(
    config: &RetryConfig,
    classifier: C,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> RetryAction,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if attempt >= config.max_retries || classifier(&e) == RetryAction::Abort {
                    return Err(e);
                }
                let delay = config.delay_for_retry(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "Transient error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
