//! Wait-for-state primitive
//!
//! [`StateChangeConf`] repeatedly invokes a refresh function until the
//! observed state reaches a target, a fatal condition is hit, or the deadline
//! elapses.
//!
//! ## Refresh contract
//!
//! A refresh returns:
//! - `Ok(Some((object, state)))`: the object exists and is in `state`
//! - `Ok(None)`: the object does not exist
//! - `Err(e)`: polling aborts with `e`
//!
//! ## Outcomes
//!
//! ```text
//!   state in target ──────────────► done (after N consecutive hits)
//!   state in pending ─────────────► keep polling
//!   any other state ──────────────► UnexpectedState   (when pending is non-empty)
//!   not found, target empty ──────► done (object is gone)
//!   not found, target non-empty ──► keep polling, NotFound after `not_found_checks`
//!   deadline ─────────────────────► Timeout
//! ```

pub mod custom_domain;

pub use custom_domain::{
    status_custom_domain, wait_custom_domain_association_created,
    wait_custom_domain_association_deleted,
};

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until, timeout_at};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// First backoff step when no poll interval is configured
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Upper bound of the backoff between refreshes
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Default number of consecutive "not found" refreshes tolerated
pub const DEFAULT_NOT_FOUND_CHECKS: usize = 20;

/// Configuration of a single wait-for-state loop
///
/// # Example
///
/// ```rust,ignore
/// let conf = StateChangeConf::new(refresh, Duration::from_secs(300))
///     .with_pending(["creating"])
///     .with_target(["active"]);
///
/// let object = conf.wait_for_state().await?;
/// ```
pub struct StateChangeConf<F> {
    /// States that mean "keep waiting"
    pending: Vec<String>,

    /// States that finish the wait; empty means "until the object is gone"
    target: Vec<String>,

    /// Refresh function invoked once per tick
    refresh: F,

    /// Deadline for the whole wait
    timeout: Duration,

    /// Sleep before the first refresh
    delay: Duration,

    /// Lower bound on the sleep between refreshes
    min_timeout: Duration,

    /// Fixed sleep between refreshes; zero selects exponential backoff
    poll_interval: Duration,

    /// Consecutive "not found" refreshes tolerated while a target is set
    not_found_checks: usize,

    /// Consecutive target hits required to finish
    continuous_target_occurence: usize,
}

impl<F, Fut, T> StateChangeConf<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<(T, String)>>>,
{
    /// Create a wait with no pending or target states
    pub fn new(refresh: F, timeout: Duration) -> Self {
        Self {
            pending: Vec::new(),
            target: Vec::new(),
            refresh,
            timeout,
            delay: Duration::ZERO,
            min_timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
            continuous_target_occurence: 1,
        }
    }

    /// Set the states that mean "keep waiting"
    pub fn with_pending<I, S>(mut self, pending: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending = pending.into_iter().map(Into::into).collect();
        self
    }

    /// Set the states that finish the wait
    pub fn with_target<I, S>(mut self, target: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target = target.into_iter().map(Into::into).collect();
        self
    }

    /// Sleep before the first refresh
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Never sleep less than this between refreshes
    pub fn with_min_timeout(mut self, min_timeout: Duration) -> Self {
        self.min_timeout = min_timeout;
        self
    }

    /// Use a fixed interval between refreshes instead of backoff
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Number of consecutive "not found" refreshes tolerated
    pub fn with_not_found_checks(mut self, not_found_checks: usize) -> Self {
        self.not_found_checks = not_found_checks;
        self
    }

    /// Number of consecutive target hits required
    pub fn with_continuous_target_occurence(mut self, occurences: usize) -> Self {
        self.continuous_target_occurence = occurences.max(1);
        self
    }

    /// Run the wait loop
    ///
    /// # Returns
    ///
    /// - `Ok(Some(object))`: A target state was reached
    /// - `Ok(None)`: The target set is empty and the object is gone
    /// - `Err(Error)`: Refresh error, unexpected state, not found, or timeout
    pub async fn wait_for_state(mut self) -> Result<Option<T>> {
        let deadline = Instant::now().checked_add(self.timeout).ok_or_else(|| {
            Error::config(format!("Wait timeout {:?} is out of range", self.timeout))
        })?;
        let mut last_state = String::new();
        let mut wait = Duration::ZERO;
        let mut not_found_ticks = 0usize;
        let mut target_occurence = 0usize;

        debug!(
            "Waiting for state to become: {:?} (pending: {:?}, timeout: {:?})",
            self.target, self.pending, self.timeout
        );

        if !self.delay.is_zero() {
            if !fits_before(self.delay, deadline) {
                sleep_until(deadline).await;
                return Err(self.timeout_error(last_state));
            }
            sleep(self.delay).await;
        }

        loop {
            let refreshed = match timeout_at(deadline, (self.refresh)()).await {
                Ok(result) => result?,
                Err(_) => return Err(self.timeout_error(last_state)),
            };

            match refreshed {
                None => {
                    last_state.clear();

                    if self.target.is_empty() {
                        target_occurence += 1;
                        if target_occurence >= self.continuous_target_occurence {
                            return Ok(None);
                        }
                    } else {
                        target_occurence = 0;
                        not_found_ticks += 1;
                        if not_found_ticks > self.not_found_checks {
                            return Err(Error::not_found(format!(
                                "couldn't find resource ({} retries)",
                                self.not_found_checks
                            )));
                        }
                    }
                }
                Some((object, state)) => {
                    not_found_ticks = 0;
                    trace!("Refresh observed state '{}'", state);

                    if self.target.iter().any(|s| *s == state) {
                        target_occurence += 1;
                        if target_occurence >= self.continuous_target_occurence {
                            return Ok(Some(object));
                        }
                    } else if self.pending.iter().any(|s| *s == state) {
                        target_occurence = 0;
                    } else if !self.pending.is_empty() {
                        return Err(Error::UnexpectedState {
                            state,
                            expected: self.target.clone(),
                        });
                    }

                    last_state = state;
                }
            }

            wait = self.next_wait(wait);
            if !fits_before(wait, deadline) {
                sleep_until(deadline).await;
                return Err(self.timeout_error(last_state));
            }

            trace!("Sleeping {:?} before next refresh", wait);
            sleep(wait).await;
        }
    }

    fn next_wait(&self, previous: Duration) -> Duration {
        let wait = if !self.poll_interval.is_zero() {
            self.poll_interval
        } else if previous.is_zero() {
            INITIAL_BACKOFF
        } else {
            previous.saturating_mul(2).min(MAX_BACKOFF)
        };

        wait.max(self.min_timeout)
    }

    fn timeout_error(&self, last_state: String) -> Error {
        Error::Timeout {
            expected: self.target.clone(),
            last_state,
            timeout: self.timeout,
        }
    }
}

/// Whether sleeping `wait` from now ends before `deadline`
fn fits_before(wait: Duration, deadline: Instant) -> bool {
    Instant::now()
        .checked_add(wait)
        .is_some_and(|wake| wake < deadline)
}
