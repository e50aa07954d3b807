//! Retry handler for chain and database calls that may fail temporarily

use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::infrastructure::chain::ChainClientError;
use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

/// Errors that can tell whether another attempt may succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for ChainClientError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

impl Retryable for DbError {
    fn is_retryable(&self) -> bool {
        !self.is_duplicate()
    }
}

/// Handles retry logic for operations that may fail temporarily
#[derive(Debug, Clone)]
pub struct RetryHandler {
    max_retries: u32,
    base_delay_ms: u64,
}

impl RetryHandler {
    pub fn new() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1000,
        }
    }

    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// Execute an operation, retrying retryable failures with exponential backoff
    pub async fn execute_with_retry_and_logging<F, Fut, T, E>(
        &self,
        operation: F,
        operation_name: &str,
        chain_id: &str,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display + Retryable,
    {
        let mut retry_count = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if retry_count > 0 {
                        logging::log_info(&format!(
                            "[{}] {} succeeded after {} retries",
                            chain_id, operation_name, retry_count
                        ));
                    }
                    return Ok(result);
                }
                Err(e) => {
                    retry_count += 1;

                    if !e.is_retryable() || retry_count >= self.max_retries {
                        logging::log_error(&format!(
                            "[{}] {} failed after {} attempt(s): {}",
                            chain_id, operation_name, retry_count, e
                        ));
                        return Err(e);
                    }

                    let delay = self.calculate_delay(retry_count);
                    logging::log_warning(&format!(
                        "[{}] {} failed (attempt {}/{}): {}. Retrying in {}ms",
                        chain_id, operation_name, retry_count, self.max_retries, e, delay
                    ));

                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    /// Calculate exponential backoff delay
    fn calculate_delay(&self, retry_count: u32) -> u64 {
        self.base_delay_ms * (2_u64.pow(retry_count.saturating_sub(1)))
    }
}

impl Default for RetryHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_doubles() {
        let handler = RetryHandler::with_config(5, 100);
        assert_eq!(handler.calculate_delay(1), 100);
        assert_eq!(handler.calculate_delay(2), 200);
        assert_eq!(handler.calculate_delay(4), 800);
    }

    #[tokio::test]
    async fn retries_transient_errors() {
        let handler = RetryHandler::with_config(3, 1);
        let attempts = AtomicU32::new(0);

        let result = handler
            .execute_with_retry_and_logging(
                || async {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(ChainClientError::StatusError {
                            url: "http://node/status".to_string(),
                            status: 503,
                        })
                    } else {
                        Ok(7u64)
                    }
                },
                "get_current_height",
                "test-1",
            )
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_malformed_responses() {
        let handler = RetryHandler::with_config(3, 1);
        let attempts = AtomicU32::new(0);

        let result: Result<u64, ChainClientError> = handler
            .execute_with_retry_and_logging(
                || async {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(ChainClientError::ResponseError("bad".to_string()))
                },
                "get_current_height",
                "test-1",
            )
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
