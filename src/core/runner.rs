//! # Start path: run one unit to completion.
//!
//! One [`run_unit`] future is spawned per registered unit, in registration order.
//!
//! ## Event flow
//! ```text
//! publish UnitStarting
//!   └─► unit.run()
//!         ├─ Ok(())                      ──► UnitStopped   (info)
//!         ├─ Err(e), shutting down       ──► UnitFailed    (error, expected)
//!         ├─ Err(e), not shutting down   ──► UnitFailed    (fatal, unexpected)
//!         └─ panic                       ──► UnitPanicked  (fatal)
//! drop CompletionGuard (exactly once, whatever happened)
//! ```
//!
//! ## Rules
//! - A failing unit never stops its siblings; reacting to a fatal event is the host's call.
//! - The shutting-down flag is read **after** `run` returns.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;

use crate::core::completion::CompletionGuard;
use crate::events::{Bus, Event, EventKind, Severity};
use crate::subscribers::panic_message;
use crate::units::UnitRef;

/// Runs `unit` once and reports how it ended.
pub(crate) async fn run_unit(
    unit: UnitRef,
    bus: Bus,
    shutting_down: Arc<AtomicBool>,
    _done: CompletionGuard,
) {
    let id = unit.id();
    bus.publish(Event::new(EventKind::UnitStarting).with_unit(id));

    let res = AssertUnwindSafe(unit.run()).catch_unwind().await;
    let expected = shutting_down.load(Ordering::Acquire);

    let ev = match res {
        Ok(Ok(())) => Event::new(EventKind::UnitStopped),
        Ok(Err(e)) => {
            let severity = if expected {
                Severity::Error
            } else {
                Severity::Fatal
            };
            Event::new(EventKind::UnitFailed)
                .with_reason(e.to_string())
                .with_severity(severity)
        }
        Err(panic) => Event::new(EventKind::UnitPanicked).with_reason(panic_message(panic.as_ref())),
    };
    bus.publish(ev.with_unit(id));
}
