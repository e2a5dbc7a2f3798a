//! Runtime core: orchestration and lifecycle.
//!
//! The public API from this module is [`Supervisor`] (plus its builder and
//! [`Config`]) and [`Signal`].
//!
//! Internal modules:
//! - [`supervisor`]: registration, `run`, `stop`, grace escalation;
//! - [`runner`]: start path of one unit, outcome classification;
//! - [`stopper`]: reverse-order dispatch of shutdown calls;
//! - [`completion`]: barrier `run` waits on;
//! - [`shutdown`]: OS signal subscription.

mod builder;
mod completion;
mod config;
mod runner;
mod shutdown;
mod stopper;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::Config;
pub use shutdown::Signal;
pub use supervisor::Supervisor;
