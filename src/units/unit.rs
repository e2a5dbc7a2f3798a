//! # Unit contract.
//!
//! A [`Unit`] is an opaque long-running piece of work (an HTTP server, a poller,
//! a consumer loop). The supervisor only needs three things from it: an id for
//! logs, a `run` that occupies its own task, and a `shutdown` that makes `run`
//! return before the given [`Deadline`].
//!
//! The common handle type is [`UnitRef`], an `Arc<dyn Unit>` shared between the
//! start path and the stop path.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::UnitError;
use crate::units::Deadline;

/// Shared handle to a unit.
pub type UnitRef = Arc<dyn Unit>;

/// # Long-running, externally stoppable unit.
///
/// ## Contract
/// - [`run`](Unit::run) may block (asynchronously) for the whole process lifetime.
///   It returns on normal completion, on failure, or after `shutdown` was invoked.
/// - [`shutdown`](Unit::shutdown) must cause a pending `run` to return, and should
///   itself give up once the deadline has passed. It may be invoked more than once
///   (several signals, or a signal plus a manual stop) and must tolerate that.
/// - The supervisor never kills a unit that ignores its deadline; unless a grace
///   period is configured, such a unit keeps [`Supervisor::run`](crate::Supervisor::run) pending.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio::sync::Notify;
/// use unitvisor::{Deadline, Unit, UnitError};
///
/// struct Gate {
///     open: Notify,
/// }
///
/// #[async_trait]
/// impl Unit for Gate {
///     fn id(&self) -> &str { "gate" }
///
///     async fn run(&self) -> Result<(), UnitError> {
///         self.open.notified().await;
///         Ok(())
///     }
///
///     async fn shutdown(&self, _deadline: Deadline) -> Result<(), UnitError> {
///         self.open.notify_one();
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Unit: Send + Sync + 'static {
    /// Returns the unit identifier used in log events.
    fn id(&self) -> &str;

    /// Runs the unit until it completes, fails, or is shut down.
    async fn run(&self) -> Result<(), UnitError>;

    /// Requests the unit to stop; `run` should return before `deadline`.
    async fn shutdown(&self, deadline: Deadline) -> Result<(), UnitError>;
}
