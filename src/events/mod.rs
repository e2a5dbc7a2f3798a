//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the supervisor, the unit
//! runners, the stop dispatcher and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Severity`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor`, `runner::run_unit`, `stopper::dispatch`,
//!   the signal listener, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the supervisor's subscriber listener (fans out to
//!   `SubscriberSet`), and any receiver from [`Supervisor::subscribe`](crate::Supervisor::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, Severity};
