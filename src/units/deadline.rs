//! # Shutdown deadline.
//!
//! A [`Deadline`] is the single time horizon computed once per stop trigger and
//! shared by every unit's `shutdown` call of that round.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};

use crate::error::UnitError;

/// Roughly 30 years; used when `now + timeout` overflows `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Point in time by which a unit is expected to have stopped.
///
/// Uses [`tokio::time::Instant`], so it follows the paused clock in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now. Saturates instead of overflowing.
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { at }
    }

    /// Deadline at an explicit instant.
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// The instant this deadline expires.
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left until expiry (`Duration::ZERO` once expired).
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Returns `true` once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Completes when the deadline is reached.
    pub async fn expired(&self) {
        time::sleep_until(self.at).await;
    }

    /// Bounds `fut` by this deadline.
    ///
    /// Returns [`UnitError::DeadlineExceeded`] carrying the time that was left
    /// when the wait started.
    ///
    /// # Example
    /// ```
    /// # #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// # async fn main() {
    /// use std::time::Duration;
    /// use unitvisor::{Deadline, UnitError};
    ///
    /// let deadline = Deadline::after(Duration::from_secs(1));
    /// let res = deadline.timeout(std::future::pending::<()>()).await;
    /// assert_eq!(res, Err(UnitError::DeadlineExceeded { timeout: Duration::from_secs(1) }));
    /// # }
    /// ```
    pub async fn timeout<F: Future>(&self, fut: F) -> Result<F::Output, UnitError> {
        let budget = self.remaining();
        time::timeout_at(self.at, fut)
            .await
            .map_err(|_elapsed| UnitError::DeadlineExceeded { timeout: budget })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn remaining_shrinks_with_time() {
        let d = Deadline::after(Duration::from_secs(10));
        assert_eq!(d.remaining(), Duration::from_secs(10));

        time::advance(Duration::from_secs(4)).await;
        assert_eq!(d.remaining(), Duration::from_secs(6));
        assert!(!d.is_expired());

        time::advance(Duration::from_secs(7)).await;
        assert_eq!(d.remaining(), Duration::ZERO);
        assert!(d.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_passes_through_early_completion() {
        let d = Deadline::after(Duration::from_secs(5));
        let out = d
            .timeout(async {
                time::sleep(Duration::from_secs(4)).await;
                7
            })
            .await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_instant_expires_on_time() {
        let start = Instant::now();
        let d = Deadline::at(start + Duration::from_secs(3));
        assert_eq!(d.instant(), start + Duration::from_secs(3));

        d.expired().await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert!(d.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn huge_timeout_saturates() {
        let d = Deadline::after(Duration::MAX);
        assert!(d.remaining() > Duration::from_secs(86_400 * 365));
    }
}
