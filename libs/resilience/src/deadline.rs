/// Deadline wrapper for async remote calls
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound on the wall-clock time of one remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub duration: Duration,
}

impl Deadline {
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::from_secs(30)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeadlineError {
    #[error("call exceeded its {0:?} deadline")]
    Elapsed(Duration),
}

/// Run a call under a deadline, returning its output or `Elapsed`.
///
/// The call's own success or failure is passed through untouched; only
/// the deadline expiry is mapped to an error here.
pub async fn with_deadline<F>(deadline: Deadline, call: F) -> Result<F::Output, DeadlineError>
where
    F: Future,
{
    match timeout(deadline.duration, call).await {
        Ok(output) => Ok(output),
        Err(_) => {
            tracing::warn!(deadline = ?deadline.duration, "remote call deadline elapsed");
            Err(DeadlineError::Elapsed(deadline.duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_passes_output_through() {
        let result = with_deadline(Deadline::from_secs(1), async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_deadline_passes_errors_through() {
        let result =
            with_deadline(Deadline::from_secs(1), async { Err::<i32, _>("backend down") }).await;
        assert_eq!(result.unwrap(), Err("backend down"));
    }

    #[tokio::test]
    async fn test_deadline_elapsed() {
        let result = with_deadline(Deadline::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            42
        })
        .await;

        assert!(matches!(result, Err(DeadlineError::Elapsed(_))));
    }

    #[tokio::test]
    async fn test_dropping_the_wrapper_cancels_the_call() {
        let fut = with_deadline(Deadline::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        drop(fut);
    }
}
