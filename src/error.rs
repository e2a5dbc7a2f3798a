//! Error types used by the unitvisor runtime and units.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`]: errors returned by [`Supervisor::run`](crate::Supervisor::run) and friends.
//! - [`UnitError`]: errors returned by a unit's `run` or `shutdown`.
//!
//! Unit errors never travel back through `run`: the supervisor contains them at the
//! unit-task boundary and reports them as events. Both types provide helper methods
//! (`as_label`, `as_message`) for logging.

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the supervisor itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// `run` was called without any registered unit. Nothing was spawned.
    #[error("units list is empty")]
    NoUnitsRegistered,

    /// The supervisor already ran (or is running); units can no longer be added
    /// and `run` cannot be entered twice.
    #[error("supervisor already started")]
    AlreadyStarted,

    /// Subscribing to OS termination signals failed.
    #[error("failed to subscribe to termination signals: {error}")]
    SignalSetup {
        /// The underlying I/O error message.
        error: String,
    },

    /// Units were still running after the shutdown deadline plus the configured grace
    /// period; their tasks were aborted.
    #[error("shutdown grace {grace:?} exceeded; aborted: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Ids of the units whose tasks were aborted.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use unitvisor::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::NoUnitsRegistered.as_label(), "runtime_no_units");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoUnitsRegistered => "runtime_no_units",
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::SignalSetup { .. } => "runtime_signal_setup",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NoUnitsRegistered => "no units registered".to_string(),
            RuntimeError::AlreadyStarted => "supervisor already started".to_string(),
            RuntimeError::SignalSetup { error } => format!("signal setup: {error}"),
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck units={stuck:?}")
            }
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::SignalSetup {
            error: e.to_string(),
        }
    }
}

/// # Errors produced by units.
///
/// Returned from [`Unit::run`](crate::Unit::run) and [`Unit::shutdown`](crate::Unit::shutdown).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The unit failed.
    #[error("unit failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The shutdown deadline elapsed before the unit finished stopping.
    #[error("deadline exceeded after {timeout:?}")]
    DeadlineExceeded {
        /// Time that was available when the deadline-bound wait started.
        timeout: Duration,
    },

    /// The unit's work was cancelled.
    #[error("unit cancelled")]
    Canceled,
}

impl UnitError {
    /// Shorthand for [`UnitError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use unitvisor::UnitError;
    ///
    /// let err = UnitError::fail("address in use");
    /// assert_eq!(err.to_string(), "unit failed: address in use");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        UnitError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitError::Fail { .. } => "unit_failed",
            UnitError::DeadlineExceeded { .. } => "unit_deadline_exceeded",
            UnitError::Canceled => "unit_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            UnitError::Fail { error } => format!("error: {error}"),
            UnitError::DeadlineExceeded { timeout } => format!("deadline exceeded: {timeout:?}"),
            UnitError::Canceled => "cancelled".to_string(),
        }
    }
}

impl From<std::io::Error> for UnitError {
    fn from(e: std::io::Error) -> Self {
        UnitError::fail(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(RuntimeError::AlreadyStarted.as_label(), "runtime_already_started");
        let grace = RuntimeError::GraceExceeded {
            grace: Duration::from_secs(1),
            stuck: vec!["db".into()],
        };
        assert_eq!(grace.as_label(), "runtime_grace_exceeded");
        assert!(grace.as_message().contains("db"));
        assert_eq!(UnitError::Canceled.as_label(), "unit_canceled");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        assert_eq!(UnitError::from(io), UnitError::fail("busy"));

        let io = std::io::Error::other("no signals");
        assert!(matches!(RuntimeError::from(io), RuntimeError::SignalSetup { .. }));
    }
}
