//! # Closure-backed unit (`UnitFn`)
//!
//! [`UnitFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`. `run` calls the
//! closure with the unit's token; `shutdown` cancels that token and then waits,
//! bounded by the deadline, until the closure's future has returned.
//!
//! ## Rules
//! - The token is cancelled once and stays cancelled: a `UnitFn` is meant to run once.
//! - Shutdown before the unit ever ran returns immediately; a later `run` sees a
//!   cancelled token.
//! - Redundant shutdowns are harmless.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use unitvisor::{UnitFn, UnitRef, UnitError};
//!
//! let ticker: UnitRef = UnitFn::arc("ticker", |ctx: CancellationToken| async move {
//!     while !ctx.is_cancelled() {
//!         tokio::select! {
//!             _ = ctx.cancelled() => break,
//!             _ = tokio::time::sleep(Duration::from_secs(1)) => {}
//!         }
//!     }
//!     Ok::<_, UnitError>(())
//! });
//!
//! assert_eq!(ticker.id(), "ticker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::UnitError;
use crate::units::{Deadline, Unit};

/// Function-backed unit implementation.
#[derive(Debug)]
pub struct UnitFn<F> {
    id: Cow<'static, str>,
    f: F,
    token: CancellationToken,
    finished: CancellationToken,
    started: AtomicBool,
}

impl<F> UnitFn<F> {
    /// Creates a new function-backed unit.
    ///
    /// Prefer [`UnitFn::arc`] when you immediately need a [`UnitRef`](crate::UnitRef).
    pub fn new<Fut>(id: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), UnitError>>,
    {
        Self {
            id: id.into(),
            f,
            token: CancellationToken::new(),
            finished: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Creates the unit and returns it as a shared handle.
    pub fn arc<Fut>(id: impl Into<Cow<'static, str>>, f: F) -> Arc<Self>
    where
        F: Fn(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), UnitError>>,
    {
        Arc::new(Self::new(id, f))
    }

    /// Token handed to the closure; cancelled by `shutdown`.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[async_trait]
impl<F, Fut> Unit for UnitFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), UnitError>> + Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self) -> Result<(), UnitError> {
        self.started.store(true, Ordering::Release);
        let _finished = self.finished.clone().drop_guard();
        (self.f)(self.token.clone()).await
    }

    async fn shutdown(&self, deadline: Deadline) -> Result<(), UnitError> {
        self.token.cancel();
        if !self.started.load(Ordering::Acquire) {
            return Ok(());
        }
        deadline.timeout(self.finished.cancelled()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_run_to_return() {
        let unit = UnitFn::arc("worker", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            time::sleep(Duration::from_millis(300)).await;
            Ok(())
        });

        let runner = {
            let unit = Arc::clone(&unit);
            tokio::spawn(async move { unit.run().await })
        };
        tokio::task::yield_now().await;

        let started = time::Instant::now();
        let res = unit.shutdown(Deadline::after(Duration::from_secs(1))).await;
        assert_eq!(res, Ok(()));
        assert_eq!(started.elapsed(), Duration::from_millis(300));
        assert_eq!(runner.await.unwrap(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_reports_deadline_exceeded() {
        let unit = UnitFn::arc("stubborn", |_ctx: CancellationToken| async move {
            std::future::pending::<()>().await;
            Ok(())
        });

        let runner = {
            let unit = Arc::clone(&unit);
            tokio::spawn(async move { unit.run().await })
        };
        tokio::task::yield_now().await;

        let res = unit.shutdown(Deadline::after(Duration::from_secs(2))).await;
        assert_eq!(
            res,
            Err(UnitError::DeadlineExceeded {
                timeout: Duration::from_secs(2)
            })
        );
        runner.abort();
    }

    #[tokio::test]
    async fn shutdown_before_run_is_immediate() {
        let unit = UnitFn::new("idle", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(UnitError::Canceled);
            }
            Ok(())
        });

        assert_eq!(unit.shutdown(Deadline::after(Duration::ZERO)).await, Ok(()));
        assert_eq!(unit.shutdown(Deadline::after(Duration::ZERO)).await, Ok(()));
        assert_eq!(unit.run().await, Err(UnitError::Canceled));
    }
}
