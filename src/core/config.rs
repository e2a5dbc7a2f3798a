//! # Supervisor configuration.
//!
//! Provides [`Config`], the settings fixed at [`Supervisor`](crate::Supervisor) build time.
//! The shutdown timeout can still be changed afterwards with
//! [`Supervisor::set_shutdown_timeout`](crate::Supervisor::set_shutdown_timeout).
//!
//! ## Sentinel values
//! - `grace = None` → never abort units; a unit ignoring its deadline keeps `run` pending
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Configuration for the supervisor.
///
/// ## Field semantics
/// - `shutdown_timeout`: horizon given to every unit's `shutdown` per stop trigger
/// - `grace`: extra wait after the first deadline before stuck units are aborted
/// - `bus_capacity`: event bus ring buffer size
/// - `os_signals`: subscribe to SIGINT/SIGTERM/SIGQUIT during `run`
#[derive(Clone, Debug)]
pub struct Config {
    /// Time each unit gets to stop, measured from the stop trigger.
    pub shutdown_timeout: Duration,

    /// Optional escalation window after the shutdown deadline.
    ///
    /// When set, units still running at `deadline + grace` are aborted and `run`
    /// returns [`RuntimeError::GraceExceeded`](crate::RuntimeError::GraceExceeded).
    pub grace: Option<Duration>,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers lagging more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,

    /// Whether `run` listens for OS termination signals.
    ///
    /// Signals raised through [`Supervisor::raise`](crate::Supervisor::raise) are
    /// handled either way.
    pub os_signals: bool,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `shutdown_timeout = 60s`
    /// - `grace = None`
    /// - `bus_capacity = 1024`
    /// - `os_signals = true`
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(60),
            grace: None,
            bus_capacity: 1024,
            os_signals: true,
        }
    }
}
