//! Output validation and the bounded retry loops around tool calls and
//! agent output (§4.4, §7): at most 2 retries per tool call, at most 2
//! retries per output validation pass.

use serde_json::Value;
use std::future::Future;

pub const MAX_TOOL_CALL_RETRIES: u32 = 2;
pub const MAX_OUTPUT_VALIDATION_RETRIES: u32 = 2;

/// Returned by an `OutputValidator` when output fails validation and should
/// be regenerated, carrying a hint the generator can fold back into its
/// next attempt.
#[derive(Debug, Clone)]
pub struct RetryRequest {
    pub reason: String,
}

pub trait OutputValidator: Send + Sync {
    fn validate(&self, output: &Value) -> Result<(), RetryRequest>;
}

/// Retry `generate` up to `MAX_OUTPUT_VALIDATION_RETRIES` times, validating
/// each attempt with `validator` before accepting it.
pub async fn validate_with_retries<F, Fut>(
    validator: &dyn OutputValidator,
    mut generate: F,
) -> Result<Value, RetryRequest>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Value>,
{
    let mut last_reason = String::new();
    for attempt in 0..=MAX_OUTPUT_VALIDATION_RETRIES {
        let output = generate().await;
        match validator.validate(&output) {
            Ok(()) => return Ok(output),
            Err(retry) => {
                tracing::warn!(attempt, reason = %retry.reason, "output validation failed, retrying");
                last_reason = retry.reason;
            }
        }
    }
    Err(RetryRequest { reason: last_reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NonEmptyValidator;
    impl OutputValidator for NonEmptyValidator {
        fn validate(&self, output: &Value) -> Result<(), RetryRequest> {
            if output.as_str().is_some_and(|s| !s.is_empty()) {
                Ok(())
            } else {
                Err(RetryRequest { reason: "empty output".to_string() })
            }
        }
    }

    #[tokio::test]
    async fn accepts_first_valid_output() {
        let result = validate_with_retries(&NonEmptyValidator, || async { Value::String("ok".to_string()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn retries_up_to_the_cap_then_gives_up() {
        let calls = AtomicU32::new(0);
        let result = validate_with_retries(&NonEmptyValidator, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Value::String(String::new()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_OUTPUT_VALIDATION_RETRIES + 1);
    }

    #[tokio::test]
    async fn succeeds_on_a_later_attempt_within_the_cap() {
        let calls = AtomicU32::new(0);
        let result = validate_with_retries(&NonEmptyValidator, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Value::String(String::new())
                } else {
                    Value::String("ok".to_string())
                }
            }
        })
        .await;
        assert!(result.is_ok());
    }
}
