//! Circuit breaker guarding calls into a `MemoryService` provider, so that a
//! down provider fails fast instead of being hammered by the retry policy.

use parking_lot::Mutex;
use second_brain_core::{Error, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            timeout: Duration::from_secs(30),
        }
    }
}

struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure_time: Option<Instant>,
}

pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure_time: None,
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    pub async fn call<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.should_allow_request() {
            debug!("circuit breaker rejecting request, circuit open");
            return Err(Error::Unavailable("provider circuit is open".to_string()));
        }

        let result = operation().await;
        self.on_result(&result);
        result
    }

    fn should_allow_request(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed_ok = inner
                    .last_failure_time
                    .map(|t| t.elapsed() >= self.config.timeout)
                    .unwrap_or(false);
                if elapsed_ok {
                    inner.state = CircuitState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn on_result<T>(&self, result: &Result<T>) {
        let mut inner = self.inner.lock();
        match result {
            Ok(_) => {
                inner.state = CircuitState::Closed;
                inner.consecutive_failures = 0;
                inner.last_failure_time = None;
            }
            Err(e) if e.is_recoverable() => {
                inner.consecutive_failures += 1;
                inner.last_failure_time = Some(Instant::now());
                if inner.consecutive_failures >= self.config.failure_threshold
                    || inner.state == CircuitState::HalfOpen
                {
                    warn!(
                        consecutive_failures = inner.consecutive_failures,
                        "circuit breaker opening"
                    );
                    inner.state = CircuitState::Open;
                }
            }
            Err(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_closed_and_passes_successes() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        let result = cb.call(|| async { Ok::<_, Error>(1) }).await;
        assert!(result.is_ok());
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn opens_after_threshold_recoverable_failures() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 3,
            timeout: Duration::from_secs(30),
        });
        for _ in 0..3 {
            let _ = cb
                .call(|| async { Err::<i32, Error>(Error::Timeout) })
                .await;
        }
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn rejects_calls_while_open() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            timeout: Duration::from_secs(30),
        });
        let _ = cb
            .call(|| async { Err::<i32, Error>(Error::Timeout) })
            .await;
        assert_eq!(cb.state(), CircuitState::Open);
        let result = cb.call(|| async { Ok::<_, Error>(1) }).await;
        assert!(matches!(result, Err(Error::Unavailable(_))));
    }

    #[tokio::test]
    async fn non_recoverable_errors_do_not_open_circuit() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            timeout: Duration::from_secs(30),
        });
        for _ in 0..5 {
            let _ = cb
                .call(|| async { Err::<i32, Error>(Error::InvalidInput("bad".to_string())) })
                .await;
        }
        assert_eq!(cb.state(), CircuitState::Closed);
    }
}
