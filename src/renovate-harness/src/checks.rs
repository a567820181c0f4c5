//! Waiting for asynchronous CI checks to settle.

use crate::github::{CheckState, RemoteError, RemoteRepository, RepositoryId};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, info_span, Instrument};

/// Errors from the check-status waiter.
#[derive(Debug, Error)]
pub enum ChecksError {
    /// Checks were still pending when the deadline passed.
    #[error("Checks on '{reference}' still pending after {waited_secs} seconds")]
    TimedOut { reference: String, waited_secs: u64 },

    /// Reading the status failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Poll cadence plus an absolute deadline.
///
/// The deadline is absolute so several waits can share one budget.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub deadline: Instant,
}

impl WaitOptions {
    /// Deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            deadline: Instant::now() + timeout,
        }
    }
}

/// Polls `reference` until its checks leave the pending state.
///
/// Returns the settled state, success or failure alike; a failed check is a
/// valid outcome for the caller to act on.
///
/// # Errors
///
/// Returns [`ChecksError::TimedOut`] if the deadline passes first.
pub async fn wait_for_checks_to_settle<R>(
    remote: &R,
    repo: &RepositoryId,
    reference: &str,
    options: WaitOptions,
) -> Result<CheckState, ChecksError>
where
    R: RemoteRepository + ?Sized,
{
    let span = info_span!("wait_for_checks", repo = %repo, reference);

    async {
        let started = Instant::now();

        loop {
            let state = remote.check_state(repo, reference).await?;
            if state.is_settled() {
                info!(state = state.as_str(), "Checks settled");
                return Ok(state);
            }

            let now = Instant::now();
            if now >= options.deadline {
                return Err(ChecksError::TimedOut {
                    reference: reference.to_string(),
                    waited_secs: now.duration_since(started).as_secs(),
                });
            }

            debug!("Checks pending, polling again");
            tokio::time::sleep_until((now + options.poll_interval).min(options.deadline)).await;
        }
    }
    .instrument(span)
    .await
}
