//! Run a future with a deadline and a stated fallback.

use std::future::Future;
use std::time::Duration;

/// What to produce when the deadline passes first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fallback<T> {
    /// Use this value as if the operation had returned it.
    Assume(T),
    /// Report that the operation timed out.
    Fail,
}

/// The operation did not finish in time and the fallback was `Fail`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimedOut(pub Duration);

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timed out after {} ms", self.0.as_millis())
    }
}

impl std::error::Error for TimedOut {}

/// Await `operation` for at most `duration`; on elapse apply `fallback`.
/// The operation is dropped when the deadline hits.
pub async fn with_timeout<F, T>(
    operation: F,
    duration: Duration,
    fallback: Fallback<T>,
) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(duration, operation).await {
        Ok(value) => Ok(value),
        Err(_) => match fallback {
            Fallback::Assume(value) => {
                log::warn!(
                    "Operation timed out after {} ms, using fallback",
                    duration.as_millis()
                );
                Ok(value)
            }
            Fallback::Fail => Err(TimedOut(duration)),
        },
    }
}
