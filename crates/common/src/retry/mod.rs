use std::time::Duration;

use tracing::{error, warn};

pub mod policies;

/// Default maximum number of retries for collaborator calls (RPC, fee
/// estimator, etc).
pub const DEFAULT_CALL_MAX_RETRIES: u16 = 4;

/// Trait for computing retry delays.
pub trait Backoff {
    /// Delay before the first retry, in milliseconds.
    fn base_delay_ms(&self) -> u64;

    /// Delay to use after a retry that waited `curr_delay_ms`.
    fn next_delay_ms(&self, curr_delay_ms: u64) -> u64;
}

/// Runs a fallible async operation with a backoff retry.
///
/// Retries the given `operation` up to `max_retries` times with delays
/// increasing according to the provided config that implements [`Backoff`].
///
/// Logs a warning on each failure and an error if all retries are exhausted.
pub async fn retry_with_backoff<R, E, F, Fut>(
    name: &str,
    max_retries: u16,
    backoff: &impl Backoff,
    mut operation: F,
) -> Result<R, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<R, E>>,
    E: std::fmt::Debug,
{
    let mut delay = backoff.base_delay_ms();

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries => {
                warn!(
                    "attempt {} failed with {:?} while running {}, retrying in {}ms",
                    attempt, err, name, delay
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = backoff.next_delay_ms(delay);
            }
            Err(err) => {
                error!("{} failed after {} attempts: {:?}", name, attempt + 1, err);
                return Err(err);
            }
        }
    }

    unreachable!("loop always returns on last iteration")
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;
    use crate::retry::policies::ExponentialBackoff;

    #[tokio::test]
    async fn succeeds_after_retries() {
        let attempts = Arc::new(AtomicU32::new(0));
        let backoff = ExponentialBackoff::new(1, 15, 10);

        let result: Result<&str, &str> = retry_with_backoff("test_op", 3, &backoff, || {
            let attempts = Arc::clone(&attempts);
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("fail")
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("success"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fails_after_exhausting_retries() {
        let attempts = Arc::new(AtomicU32::new(0));
        let backoff = ExponentialBackoff::new(1, 15, 10);

        let result: Result<&str, &str> = retry_with_backoff("test_op", 2, &backoff, || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("fail")
            }
        })
        .await;

        assert_eq!(result, Err("fail"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
