//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Runner / Stopper / Signals ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                                │
//!                                                          SubscriberSet::emit
//!                                                      ┌─────────┼─────────┐
//!                                                      ▼         ▼         ▼
//!                                                  LogWriter  Metrics   Custom
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
pub(crate) use subscriber_set::panic_message;
