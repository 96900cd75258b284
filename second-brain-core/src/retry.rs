//! Provider-agnostic retry policy: exponential backoff with jitter, bounded
//! attempts, used by every `MemoryService` implementation for transient
//! errors (timeouts, 5xx, connection reset) per §4.1.3.

use crate::error::Error;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

pub trait Retryable {
    fn is_recoverable(&self) -> bool;
}

impl Retryable for Error {
    fn is_recoverable(&self) -> bool {
        Error::is_recoverable(self)
    }
}

#[derive(Debug, Default)]
pub struct RetryMetrics {
    total: AtomicU64,
    success: AtomicU64,
    failure: AtomicU64,
}

impl RetryMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_retry(&self, succeeded: bool) {
        self.total.fetch_add(1, Ordering::SeqCst);
        if succeeded {
            self.success.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failure.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn success_count(&self) -> u64 {
        self.success.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failure.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter_factor: 0.25,
        }
    }
}

pub struct RetryPolicy {
    config: RetryConfig,
    metrics: RetryMetrics,
}

impl RetryPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RetryConfig::default(),
            metrics: RetryMetrics::new(),
        }
    }

    #[must_use]
    pub fn with_config(config: RetryConfig) -> Self {
        Self {
            config,
            metrics: RetryMetrics::new(),
        }
    }

    #[must_use]
    pub fn metrics(&self) -> &RetryMetrics {
        &self.metrics
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self.config.base_delay * (2u32.pow(attempt.saturating_sub(1)));
        let delay = std::cmp::min(exp_delay, self.config.max_delay);

        if self.config.jitter_factor > 0.0 {
            let jitter_range = delay.as_millis() as f64 * self.config.jitter_factor;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            let adjusted_ms = (delay.as_millis() as f64 + jitter).max(0.0);
            Duration::from_millis(adjusted_ms as u64)
        } else {
            delay
        }
    }

    /// Execute `operation`, retrying recoverable errors up to
    /// `config.max_retries` times with exponential backoff.
    pub async fn execute<F, T, E, Fut>(&self, operation: F) -> std::result::Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Retryable + std::fmt::Debug,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        self.metrics.record_retry(true);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !e.is_recoverable() || attempt >= self.config.max_retries {
                        if attempt > 0 {
                            self.metrics.record_retry(false);
                        }
                        return Err(e);
                    }
                    attempt += 1;
                    let delay = self.calculate_delay(attempt);
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        ?delay,
                        "retrying recoverable error"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
