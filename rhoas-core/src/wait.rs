//! Wait - Poll a remote resource until it settles
//!
//! `StateChangeConf` repeatedly calls a refresh function and classifies the
//! status it reports:
//!
//! - a status in `target` ends the wait successfully,
//! - a status in `pending` keeps polling after `poll_interval`,
//! - any other status ends the wait with `WaitError::UnexpectedState`.
//!
//! Refresh errors end the wait immediately. The whole wait is bounded by
//! `timeout` and can be interrupted through a `Cancellation`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::time::{Instant, sleep_until, timeout_at};

use crate::cancel::Cancellation;

/// Errors returned by `StateChangeConf::wait_for_state`
#[derive(Debug, thiserror::Error)]
pub enum WaitError<E>
where
    E: std::error::Error + 'static,
{
    #[error(
        "timeout while waiting for state to become '{target}' (last state: '{last_state}', timeout: {timeout:?})"
    )]
    Timeout {
        last_state: String,
        target: String,
        timeout: Duration,
    },

    #[error("unexpected state '{state}', wanted target '{target}'")]
    UnexpectedState { state: String, target: String },

    #[error("cancelled while waiting for state to become '{target}'")]
    Cancelled { target: String },

    #[error(transparent)]
    Refresh(E),
}

/// Configuration of a status wait
#[derive(Debug, Clone)]
pub struct StateChangeConf<S> {
    /// Statuses that mean "still in progress"
    pub pending: Vec<S>,
    /// Statuses that mean "done"
    pub target: Vec<S>,
    /// Wait before the first refresh
    pub delay: Duration,
    /// Wait between refreshes
    pub poll_interval: Duration,
    /// Budget for the whole wait, including `delay`
    pub timeout: Duration,
}

impl<S> StateChangeConf<S>
where
    S: PartialEq + fmt::Display,
{
    fn target_display(&self) -> String {
        self.target
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Poll `refresh` until it reports a target status, returning the value
    /// that accompanied it.
    pub async fn wait_for_state<T, E, F, Fut>(
        &self,
        cancellation: &Cancellation,
        mut refresh: F,
    ) -> Result<T, WaitError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(T, S), E>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last_state: Option<S> = None;
        let mut wait = self.delay;

        let timed_out = |last_state: &Option<S>| WaitError::Timeout {
            last_state: last_state
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            target: self.target_display(),
            timeout: self.timeout,
        };

        loop {
            let wake = (Instant::now() + wait).min(deadline);
            tokio::select! {
                _ = sleep_until(wake) => {}
                _ = cancellation.cancelled() => {
                    return Err(WaitError::Cancelled { target: self.target_display() });
                }
            }

            if Instant::now() >= deadline {
                return Err(timed_out(&last_state));
            }

            let refreshed = tokio::select! {
                result = timeout_at(deadline, refresh()) => result,
                _ = cancellation.cancelled() => {
                    return Err(WaitError::Cancelled { target: self.target_display() });
                }
            };

            let (value, state) = match refreshed {
                Ok(Ok(pair)) => pair,
                Ok(Err(e)) => return Err(WaitError::Refresh(e)),
                Err(_elapsed) => return Err(timed_out(&last_state)),
            };

            if self.target.contains(&state) {
                debug!("reached target state '{}'", state);
                return Ok(value);
            }

            if !self.pending.contains(&state) {
                return Err(WaitError::UnexpectedState {
                    state: state.to_string(),
                    target: self.target_display(),
                });
            }

            debug!(
                "state is '{}', waiting for '{}'",
                state,
                self.target_display()
            );
            last_state = Some(state);
            wait = self.poll_interval;
        }
    }
}
