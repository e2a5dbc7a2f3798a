//! # Termination signals.
//!
//! [`Signal`] names what triggered a shutdown. [`OsSignals`] subscribes to the
//! process termination signals once per `run` and yields them as they arrive.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal)
//!
//! **Other platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]
//!
//! Every signal is handled identically; only its name ends up in the logs.

use std::fmt;

/// A termination request delivered to the signal listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` / Ctrl-C.
    Interrupt,
    /// `SIGTERM`.
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// Any other named signal a host chooses to forward.
    Other(&'static str),
}

impl Signal {
    /// Conventional signal name.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
            Signal::Other(name) => name,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subscription to the OS termination signals.
///
/// Registration happens in [`OsSignals::subscribe`], so failures surface before
/// any unit is spawned.
#[cfg(unix)]
pub(crate) struct OsSignals {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
    sigquit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl OsSignals {
    pub(crate) fn subscribe() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
            sigquit: signal(SignalKind::quit())?,
        })
    }

    /// Waits for the next signal. Pends forever once every stream is closed.
    pub(crate) async fn recv(&mut self) -> Signal {
        tokio::select! {
            Some(()) = self.sigint.recv()  => Signal::Interrupt,
            Some(()) = self.sigterm.recv() => Signal::Terminate,
            Some(()) = self.sigquit.recv() => Signal::Quit,
            else => std::future::pending().await,
        }
    }
}

#[cfg(not(unix))]
pub(crate) struct OsSignals;

#[cfg(not(unix))]
impl OsSignals {
    pub(crate) fn subscribe() -> std::io::Result<Self> {
        Ok(Self)
    }

    /// Waits for the next Ctrl-C. Pends forever if the handler cannot be installed.
    pub(crate) async fn recv(&mut self) -> Signal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Signal::Interrupt,
            Err(_) => std::future::pending().await,
        }
    }
}

/// Next OS signal, or never when OS signals are disabled.
pub(crate) async fn next_os_signal(os: &mut Option<OsSignals>) -> Signal {
    match os {
        Some(os) => os.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Signal::Interrupt.name(), "SIGINT");
        assert_eq!(Signal::Quit.to_string(), "SIGQUIT");
        assert_eq!(Signal::Other("SIGHUP").name(), "SIGHUP");
    }
}
