//! # Supervisor: starts units, listens for signals, stops them in reverse order.
//!
//! The [`Supervisor`] owns the registered units, the shutdown timeout, the
//! completion barrier, the shutting-down flag and the event bus.
//!
//! ## Lifecycle
//! ```text
//! idle ──add()*──► run()
//!                   ├─ no units             ──► Err(NoUnitsRegistered)
//!                   ├─ subscribe OS signals (SIGINT/SIGTERM/SIGQUIT)
//!                   ├─ spawn runner(u0) ... runner(uN)        (registration order)
//!                   ├─ spawn signal listener
//!                   │      loop { signal ──► trigger(signal) }
//!                   └─ wait: completion barrier == 0 ──► AllStopped ──► Ok(())
//!
//! trigger(reason)   (signal listener, or stop() with reason "manual")
//!   ├─ shutting_down = true
//!   ├─ publish ShutdownRequested
//!   ├─ deadline = now + shutdown_timeout
//!   └─ stopper::dispatch(uN ... u0, deadline)   (fire-and-forget)
//! ```
//!
//! ## Rules
//! - `run` resolves only after every unit's `run` returned.
//! - Each trigger dispatches a fresh round of shutdown calls; units must tolerate repeats.
//! - A unit ignoring its deadline keeps `run` pending, unless [`Config::grace`] is set:
//!   then it is aborted at `first deadline + grace` and `run` returns
//!   [`RuntimeError::GraceExceeded`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use unitvisor::{Config, Supervisor, UnitError, UnitFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default()).build();
//!
//!     sup.add(UnitFn::arc("worker", |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, UnitError>(())
//!     }))?;
//!     sup.set_shutdown_timeout(Duration::from_secs(5));
//!
//!     let stopper = sup.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         stopper.stop();
//!     });
//!
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::{
    builder::SupervisorBuilder,
    completion::Completion,
    config::Config,
    runner,
    shutdown::{self, OsSignals, Signal},
    stopper,
};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::SubscriberSet;
use crate::units::{Deadline, UnitRef};

/// Coordinates start, stop and completion of registered units.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    units: RwLock<Vec<UnitRef>>,
    shutdown_timeout: RwLock<Duration>,
    completion: Arc<Completion>,
    shutting_down: Arc<AtomicBool>,
    started: AtomicBool,
    /// Deadline of the first stop trigger; the grace window counts from it.
    first_deadline: OnceLock<Deadline>,
    stop_requested: CancellationToken,
    signal_tx: mpsc::UnboundedSender<Signal>,
    signal_rx: Mutex<Option<mpsc::UnboundedReceiver<Signal>>>,
    /// Runtime `run` was awaited on; stop triggers from outside it spawn there.
    runtime: OnceLock<Handle>,
    /// Ends the signal listener when `run` returns.
    run_token: CancellationToken,
    /// Ends the subscriber listener when the supervisor is dropped.
    bus_token: CancellationToken,
}

impl Supervisor {
    /// Returns a builder for a supervisor with the given configuration.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus, subs: SubscriberSet) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let bus_token = CancellationToken::new();
        subscriber_listener(bus.subscribe(), subs, bus_token.clone());

        Self {
            shutdown_timeout: RwLock::new(cfg.shutdown_timeout),
            cfg,
            bus,
            units: RwLock::new(Vec::new()),
            completion: Completion::new(),
            shutting_down: Arc::new(AtomicBool::new(false)),
            started: AtomicBool::new(false),
            first_deadline: OnceLock::new(),
            stop_requested: CancellationToken::new(),
            signal_tx,
            signal_rx: Mutex::new(Some(signal_rx)),
            runtime: OnceLock::new(),
            run_token: CancellationToken::new(),
            bus_token,
        }
    }

    /// Registers a unit. Start order follows registration order; stop dispatch is reversed.
    ///
    /// Ids are not checked for uniqueness. Fails with [`RuntimeError::AlreadyStarted`]
    /// once `run` has been entered.
    pub fn add(&self, unit: UnitRef) -> Result<(), RuntimeError> {
        let mut units = self.units.write().unwrap_or_else(PoisonError::into_inner);
        if self.started.load(Ordering::Acquire) {
            return Err(RuntimeError::AlreadyStarted);
        }
        units.push(unit);
        self.completion.register();
        Ok(())
    }

    /// Overrides the shutdown timeout used by every following stop trigger.
    pub fn set_shutdown_timeout(&self, timeout: Duration) {
        *self
            .shutdown_timeout
            .write()
            .unwrap_or_else(PoisonError::into_inner) = timeout;
    }

    /// Current shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        *self
            .shutdown_timeout
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units().len()
    }

    /// Returns `true` if no unit is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once any stop trigger fired.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// New raw receiver of lifecycle events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Starts every unit and resolves once all of them have completed.
    ///
    /// Returns [`RuntimeError::NoUnitsRegistered`] without spawning anything when no
    /// unit was added, and [`RuntimeError::AlreadyStarted`] on a second call.
    pub async fn run(self: &Arc<Self>) -> Result<(), RuntimeError> {
        if self.is_empty() {
            return Err(RuntimeError::NoUnitsRegistered);
        }
        let os = if self.cfg.os_signals {
            Some(OsSignals::subscribe()?)
        } else {
            None
        };

        let units = {
            let guard = self.units.read().unwrap_or_else(PoisonError::into_inner);
            if self.started.swap(true, Ordering::AcqRel) {
                return Err(RuntimeError::AlreadyStarted);
            }
            guard.clone()
        };
        let _ = self.runtime.set(Handle::current());
        let signal_rx = self
            .signal_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let handles = self.spawn_units(&units);
        if let Some(rx) = signal_rx {
            tokio::spawn(Arc::clone(self).signal_listener(os, rx));
        }

        let outcome = self.wait_all(&handles).await;
        self.run_token.cancel();
        if outcome.is_ok() {
            self.bus.publish(Event::new(EventKind::AllStopped));
        }
        outcome
    }

    /// Requests shutdown of every unit without an OS signal.
    ///
    /// Fire-and-forget: returns as soon as the shutdown calls are dispatched. Safe to
    /// call from any task or plain thread, repeatedly, and concurrently with the signal
    /// listener. Outside a runtime the calls are spawned on the one `run` is driven by.
    pub fn stop(&self) {
        self.trigger("manual");
    }

    /// Delivers `signal` to the signal listener as if the OS had sent it.
    ///
    /// Raised before `run`, the signal is queued and handled as soon as the listener starts.
    pub fn raise(&self, signal: Signal) {
        let _ = self.signal_tx.send(signal);
    }

    fn units(&self) -> Vec<UnitRef> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Spawns one runner per unit, in registration order.
    fn spawn_units(&self, units: &[UnitRef]) -> Vec<(Arc<str>, JoinHandle<()>)> {
        units
            .iter()
            .map(|unit| {
                let id: Arc<str> = Arc::from(unit.id());
                let join = tokio::spawn(runner::run_unit(
                    Arc::clone(unit),
                    self.bus.clone(),
                    Arc::clone(&self.shutting_down),
                    self.completion.guard(),
                ));
                (id, join)
            })
            .collect()
    }

    /// Loops over OS and raised signals until `run` returns.
    async fn signal_listener(
        self: Arc<Self>,
        mut os: Option<OsSignals>,
        mut raised: mpsc::UnboundedReceiver<Signal>,
    ) {
        loop {
            let signal = tokio::select! {
                _ = self.run_token.cancelled() => break,
                Some(sig) = raised.recv() => sig,
                sig = shutdown::next_os_signal(&mut os) => sig,
            };
            self.trigger(signal.name());
        }
    }

    /// Common stop path of signals and [`Supervisor::stop`].
    fn trigger(&self, reason: &str) {
        self.shutting_down.store(true, Ordering::Release);
        let timeout = self.shutdown_timeout();
        self.bus.publish(
            Event::new(EventKind::ShutdownRequested)
                .with_signal(reason)
                .with_timeout(timeout),
        );

        let Some(rt) = Handle::try_current()
            .ok()
            .or_else(|| self.runtime.get().cloned())
        else {
            tracing::warn!(
                reason,
                "stop requested before run outside a tokio runtime; no shutdown calls dispatched"
            );
            return;
        };

        let deadline = Deadline::after(timeout);
        self.first_deadline.get_or_init(|| deadline);
        self.stop_requested.cancel();
        stopper::dispatch(&rt, &self.units(), deadline, &self.bus);
    }

    /// Waits on the completion barrier, escalating after the grace window if configured.
    async fn wait_all(&self, handles: &[(Arc<str>, JoinHandle<()>)]) -> Result<(), RuntimeError> {
        let Some(grace) = self.cfg.grace else {
            self.completion.wait().await;
            return Ok(());
        };

        tokio::select! {
            _ = self.completion.wait() => Ok(()),
            _ = self.grace_elapsed(grace) => {
                let stuck: Vec<String> = handles
                    .iter()
                    .filter(|(_, join)| !join.is_finished())
                    .map(|(id, join)| {
                        join.abort();
                        id.to_string()
                    })
                    .collect();

                self.bus.publish(
                    Event::new(EventKind::GraceExceeded)
                        .with_reason(stuck.join(","))
                        .with_timeout(grace),
                );
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }

    /// Completes at `first deadline + grace`; never before a stop was triggered.
    async fn grace_elapsed(&self, grace: Duration) {
        self.stop_requested.cancelled().await;
        match self
            .first_deadline
            .get()
            .and_then(|d| d.instant().checked_add(grace))
        {
            Some(at) => time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.bus_token.cancel();
    }
}

/// Forwards bus events to the subscriber set until `token` is cancelled,
/// then flushes what is still buffered.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    token: CancellationToken,
) {
    if set.is_empty() {
        return;
    }
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(Arc::new(ev)),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = token.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit(Arc::new(ev));
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    });
}
