//! # Stop path: dispatch shutdown calls.
//!
//! [`dispatch`] is invoked once per stop trigger (signal or `Supervisor::stop`).
//!
//! ```text
//! units [u0, u1, ..., uN]   (registration order)
//!   for u in uN ..= u0:
//!       publish UnitStopping(u)            (synchronously, so order is observable)
//!       spawn  u.shutdown(deadline)
//!                ├─ Ok   ──► UnitShutdownCompleted
//!                ├─ Err  ──► UnitShutdownFailed
//!                └─ panic ─► UnitShutdownFailed
//! return immediately
//! ```
//!
//! ## Rules
//! - Every call of a round shares the same [`Deadline`].
//! - Reverse order affects dispatch only; the calls run concurrently.
//! - Nothing here waits for the calls; `run` synchronizes on unit completion instead.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::panic_message;
use crate::units::{Deadline, UnitRef};

/// Spawns one shutdown call per unit on `rt`, last registered first.
pub(crate) fn dispatch(rt: &Handle, units: &[UnitRef], deadline: Deadline, bus: &Bus) {
    for unit in units.iter().rev() {
        bus.publish(
            Event::new(EventKind::UnitStopping)
                .with_unit(unit.id())
                .with_timeout(deadline.remaining()),
        );

        let unit = Arc::clone(unit);
        let bus = bus.clone();
        rt.spawn(async move {
            let res = AssertUnwindSafe(unit.shutdown(deadline)).catch_unwind().await;
            let ev = match res {
                Ok(Ok(())) => Event::new(EventKind::UnitShutdownCompleted),
                Ok(Err(e)) => Event::new(EventKind::UnitShutdownFailed).with_reason(e.to_string()),
                Err(panic) => Event::new(EventKind::UnitShutdownFailed)
                    .with_reason(format!("panic: {}", panic_message(panic.as_ref()))),
            };
            bus.publish(ev.with_unit(unit.id()));
        });
    }
}
