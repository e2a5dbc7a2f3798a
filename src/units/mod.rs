//! # Unit abstractions.
//!
//! This module provides the unit-related types:
//! - [`Unit`] - trait for long-running units the supervisor starts and stops
//! - [`UnitFn`] - closure-backed unit driven by a cancellation token
//! - [`UnitRef`] - shared reference to a unit (`Arc<dyn Unit>`)
//! - [`Deadline`] - shutdown horizon handed to [`Unit::shutdown`]

mod deadline;
mod unit;
mod unit_fn;

pub use deadline::Deadline;
pub use unit::{Unit, UnitRef};
pub use unit_fn::UnitFn;
