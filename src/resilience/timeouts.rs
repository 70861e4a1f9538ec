//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The wrapped future is dropped on expiry or cancellation, which releases
//!   whatever connection it held
//! - Timeout and cancellation are distinct outcomes

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a bounded operation did not finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeadlineError {
    #[error("deadline of {0:?} elapsed")]
    Elapsed(Duration),

    #[error("operation cancelled")]
    Cancelled,
}

/// Run `fut` until it completes, `limit` elapses, or `cancel` fires.
pub async fn with_deadline<F>(
    limit: Duration,
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, DeadlineError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DeadlineError::Cancelled),
        res = tokio::time::timeout(limit, fut) => res.map_err(|_| DeadlineError::Elapsed(limit)),
    }
}
