//! Status-poll reconciler
//!
//! Remote resources report a lifecycle status that moves through pending
//! values until it settles (pool creation: CREATING -> ACTIVE) or the
//! resource disappears (deletion: DELETING -> absent). This module owns
//! the one loop that observes those transitions: fetch the status with a
//! bounded backoff between attempts until it reaches a target value,
//! leaves the pending set, or the timeout elapses.
//!
//! Transport failures are not retried here; the client layer already
//! retries throttling and 5xx responses. A transport error that survives
//! the client surfaces immediately.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::api::ApiError;

/// Why a wait ended without reaching a target status
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// The resource is absent while a target status was still expected
    #[error("resource not found while waiting for target status")]
    NotFound,

    /// The status left the pending set without entering the target set
    #[error("resource entered unexpected status '{status}'")]
    UnexpectedState { status: String },

    /// The timeout elapsed while the status was still pending; reported
    /// distinctly from a failure status so callers can decide whether to
    /// treat it as terminal
    #[error("timed out after {timeout:?} waiting for target status (last observed: {last_status:?})")]
    Timeout {
        timeout: Duration,
        last_status: Option<String>,
    },

    /// The underlying call failed
    #[error("transport error while waiting: {0}")]
    Transport(#[source] ApiError),
}

/// Polling knobs. `new` picks intervals suited to minutes-long waits;
/// tests tighten them.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub max_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(10),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }
}

/// Poll `fetch` until the observed status reaches the target set.
///
/// `fetch` reports the resource and its current status, or `None` when the
/// remote reports it absent (an `ApiError::NotFound` from `fetch` reads the
/// same way). Absence counts as success when `target` is empty - that is
/// the delete-completion wait - and as [`WaitError::NotFound`] otherwise.
///
/// Returns the last-observed resource on success; `None` only for the
/// empty-target case.
pub async fn wait_for_status<T, F, Fut>(
    mut fetch: F,
    pending: &[&str],
    target: &[&str],
    config: WaitConfig,
) -> Result<Option<T>, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<(T, String)>, ApiError>>,
{
    let deadline = Instant::now() + config.timeout;
    let mut interval = config.poll_interval;
    let mut last_status: Option<String> = None;

    loop {
        let observed = match fetch().await {
            Ok(observed) => observed,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(WaitError::Transport(e)),
        };

        match observed {
            None => {
                return if target.is_empty() {
                    Ok(None)
                } else {
                    Err(WaitError::NotFound)
                };
            }
            Some((resource, status)) => {
                if target.contains(&status.as_str()) {
                    return Ok(Some(resource));
                }
                if !pending.contains(&status.as_str()) {
                    return Err(WaitError::UnexpectedState { status });
                }
                tracing::debug!("status '{}' still pending", status);
                last_status = Some(status);
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout {
                timeout: config.timeout,
                last_status,
            });
        }
        let remaining = deadline - now;
        sleep(interval.min(remaining)).await;
        interval = std::cmp::min(interval * 2, config.max_interval);
    }
}
