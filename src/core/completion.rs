//! # Completion barrier.
//!
//! Counts units that have not finished yet. Every [`Supervisor::add`](crate::Supervisor::add)
//! registers one pending completion; every unit task holds a [`CompletionGuard`]
//! that releases it exactly once when dropped (normal return, error, panic or abort).
//!
//! ```text
//! add ×N ──► pending = N
//! unit task i finishes ──► guard dropped ──► pending -= 1 ──► 0? notify_waiters
//! run ──► wait() ──► resolves once pending == 0
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Counter of outstanding unit completions with a single async waiter.
#[derive(Debug, Default)]
pub(crate) struct Completion {
    pending: AtomicUsize,
    notify: Notify,
}

impl Completion {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one more pending completion.
    pub(crate) fn register(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Returns a guard releasing one completion on drop.
    pub(crate) fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            barrier: Arc::clone(self),
        }
    }

    /// Never goes below zero.
    fn release(&self) {
        let prev = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if prev == Ok(1) {
            self.notify.notify_waiters();
        }
    }

    /// Resolves once no completion is pending.
    pub(crate) async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Releases one pending completion when dropped.
#[derive(Debug)]
pub(crate) struct CompletionGuard {
    barrier: Arc<Completion>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.barrier.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    #[tokio::test]
    async fn empty_barrier_is_open() {
        let c = Completion::new();
        c.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_every_guard() {
        let c = Completion::new();
        let mut guards = Vec::new();
        for _ in 0..3 {
            c.register();
            guards.push(c.guard());
        }

        for (i, g) in guards.into_iter().enumerate() {
            tokio::spawn(async move {
                time::sleep(Duration::from_secs(i as u64 + 1)).await;
                drop(g);
            });
        }

        let started = time::Instant::now();
        c.wait().await;
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(c.pending(), 0);
    }

    #[tokio::test]
    async fn extra_release_does_not_underflow() {
        let c = Completion::new();
        c.register();
        let g1 = c.guard();
        let g2 = c.guard();
        drop(g1);
        drop(g2);
        assert_eq!(c.pending(), 0);

        c.register();
        assert_eq!(c.pending(), 1);
    }

    #[tokio::test]
    async fn guard_released_on_panic() {
        let c = Completion::new();
        c.register();
        let g = c.guard();

        let res = tokio::spawn(async move {
            let _g = g;
            if std::hint::black_box(true) {
                panic!("unit blew up");
            }
        })
        .await;

        assert!(res.is_err());
        c.wait().await;
    }
}
