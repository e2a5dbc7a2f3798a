//! # unitvisor
//!
//! **Unitvisor** is a small process-local service supervisor for Rust.
//!
//! A host registers long-running units (HTTP servers, pollers, consumers), awaits
//! one entry point, and gets concurrent start, signal-driven shutdown in reverse
//! registration order with a shared deadline, and a barrier that resolves only
//! after every unit has returned.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Unit A    │   │    Unit B    │   │    Unit C    │
//!     │ (added 1st)  │   │ (added 2nd)  │   │ (added 3rd)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - units (ordered)          - shutting-down flag (atomic)         │
//! │  - shutdown timeout         - completion barrier                  │
//! │  - Bus (broadcast events)   - SubscriberSet (logging sinks)       │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               ▼
//!     runner(A)          runner(B)          runner(C)    signal listener
//!     A.run()            B.run()            C.run()      SIGINT/SIGTERM/SIGQUIT
//!        │                  │                  │               │
//!        └── release ───────┴── barrier ───────┘               ▼
//!                                                      stop path (also Supervisor::stop)
//!                                                      C.shutdown(d) ─┐
//!                                                      B.shutdown(d) ─┼─ spawned, same deadline d
//!                                                      A.shutdown(d) ─┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! idle ──► starting ──► running ──► stopping ──► stopped
//!  │          │                        ▲            │
//!  │          │ spawn runners          │ signal     │ barrier reached zero
//!  │          │ + signal listener      │ or stop()  ▼
//!  └─ no units: Err(NoUnitsRegistered)           run() returns Ok(())
//! ```
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                     |
//! |-------------------|--------------------------------------------------------------------|----------------------------------------|
//! | **Units**         | Contract the supervisor drives; closure-backed helper.             | [`Unit`], [`UnitFn`], [`UnitRef`]      |
//! | **Supervision**   | Start, stop, signal handling, completion barrier.                  | [`Supervisor`], [`Signal`]             |
//! | **Deadlines**     | Shared shutdown horizon with timeout helper.                       | [`Deadline`]                           |
//! | **Events**        | Structured lifecycle events with severities.                       | [`Event`], [`EventKind`], [`Severity`] |
//! | **Logging**       | Injectable sinks; `tracing`-backed writer.                         | [`Subscribe`], [`LogWriter`]           |
//! | **Errors**        | Typed errors for the runtime and units.                            | [`RuntimeError`], [`UnitError`]        |
//! | **Configuration** | Timeout, grace escalation, bus capacity, OS signals.               | [`Config`]                             |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use unitvisor::{Config, LogWriter, Supervisor, UnitError, UnitFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default())
//!         .with_subscriber(Arc::new(LogWriter::new()))
//!         .build();
//!
//!     sup.add(UnitFn::arc("db", |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, UnitError>(())
//!     }))?;
//!     sup.add(UnitFn::arc("http", |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, UnitError>(())
//!     }))?;
//!
//!     // Normally SIGINT/SIGTERM ends the run; stop manually for the example.
//!     let handle = Arc::clone(&sup);
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         handle.stop();
//!     });
//!
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod units;

// ---- Public re-exports ----

pub use crate::core::{Config, Signal, Supervisor, SupervisorBuilder};
pub use error::{RuntimeError, UnitError};
pub use events::{Bus, Event, EventKind, Severity};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use units::{Deadline, Unit, UnitFn, UnitRef};
