//! # Lifecycle events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three groups:
//! - **Start path**: a unit starting, returning, failing or panicking
//! - **Stop path**: shutdown requested, per-unit stop attempts and their outcome
//! - **Terminal**: every unit stopped, or the grace period was exceeded
//!
//! Every [`Event`] carries a [`Severity`]. Sinks such as
//! [`LogWriter`](crate::LogWriter) map it onto their own levels.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use unitvisor::{Event, EventKind, Severity};
//!
//! let ev = Event::new(EventKind::UnitFailed)
//!     .with_unit("http")
//!     .with_reason("address in use")
//!     .with_severity(Severity::Fatal);
//!
//! assert_eq!(ev.unit.as_deref(), Some("http"));
//! assert_eq!(ev.severity, Severity::Fatal);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets `unit` to the subscriber name and `reason` to the panic message.
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets `unit` to the subscriber name and `reason` to `"full"` or `"closed"`.
    SubscriberOverflow,

    // === Start path ===
    /// Unit task spawned; the unit's `run` is about to be awaited.
    ///
    /// Sets: `unit`.
    UnitStarting,

    /// Unit `run` returned `Ok(())`.
    ///
    /// Sets: `unit`.
    UnitStopped,

    /// Unit `run` returned an error.
    ///
    /// Sets: `unit`, `reason`. Severity is [`Severity::Error`] when shutdown was
    /// already requested (expected exit) and [`Severity::Fatal`] otherwise.
    UnitFailed,

    /// Unit `run` panicked. Always [`Severity::Fatal`].
    ///
    /// Sets: `unit`, `reason` (panic message).
    UnitPanicked,

    // === Stop path ===
    /// A stop was triggered by a signal or by `Supervisor::stop`.
    ///
    /// Sets: `signal` (signal name, or `"manual"`), `timeout_ms` (shutdown timeout).
    ShutdownRequested,

    /// Shutdown call dispatched to a unit.
    ///
    /// Sets: `unit`, `timeout_ms` (time left until the shared deadline).
    UnitStopping,

    /// Unit `shutdown` returned `Ok(())`.
    ///
    /// Sets: `unit`.
    UnitShutdownCompleted,

    /// Unit `shutdown` returned an error (including a missed deadline).
    ///
    /// Sets: `unit`, `reason`.
    UnitShutdownFailed,

    // === Terminal ===
    /// Every unit task has completed; `run` is about to return `Ok(())`.
    AllStopped,

    /// Units were still running after deadline + grace and were aborted.
    ///
    /// Sets: `reason` (comma-separated ids), `timeout_ms` (grace).
    GraceExceeded,
}

impl EventKind {
    /// Short stable label used as the log message tag.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
            EventKind::UnitStarting => "starting",
            EventKind::UnitStopped => "stopped",
            EventKind::UnitFailed => "failed",
            EventKind::UnitPanicked => "panicked",
            EventKind::ShutdownRequested => "shutdown-requested",
            EventKind::UnitStopping => "stopping",
            EventKind::UnitShutdownCompleted => "shutdown-completed",
            EventKind::UnitShutdownFailed => "shutdown-failed",
            EventKind::AllStopped => "all-stopped",
            EventKind::GraceExceeded => "grace-exceeded",
        }
    }

    /// Severity an event of this kind gets unless overridden.
    pub fn default_severity(&self) -> Severity {
        match self {
            EventKind::UnitPanicked => Severity::Fatal,
            EventKind::UnitFailed
            | EventKind::UnitShutdownFailed
            | EventKind::GraceExceeded => Severity::Error,
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

/// Log level attached to an event.
///
/// `Fatal` is a classification only; the supervisor never exits the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        })
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Log level.
    pub severity: Severity,
    /// Unit id (or subscriber name for subscriber events).
    pub unit: Option<Arc<str>>,
    /// Signal name that triggered a shutdown (`"manual"` for `Supervisor::stop`).
    pub signal: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Timeout or remaining deadline in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            severity: kind.default_severity(),
            kind,
            unit: None,
            signal: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches a unit id.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a signal name.
    #[inline]
    pub fn with_signal(mut self, signal: impl Into<Arc<str>>) -> Self {
        self.signal = Some(signal.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a duration (stored as milliseconds, saturating at `u32::MAX`).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Overrides the kind's default severity.
    #[inline]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_unit(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_unit(subscriber)
            .with_reason(info)
    }
}
