//! # Event bus
//!
//! [`Bus`] fans lifecycle events out from unit runners, stop dispatch and the
//! signal listener to every receiver over one [`tokio::sync::broadcast`] channel.
//!
//! ```text
//! runner(u0..uN) ──┐
//! stopper        ──┼──► Bus ──► subscriber_listener ──► SubscriberSet
//! trigger()      ──┘        └─► Supervisor::subscribe() (raw receivers)
//! ```
//!
//! ## Rules
//! - `publish()` never waits; events sent with no receiver are gone.
//! - Receivers see only events published after they subscribed.
//! - The ring buffer is shared: a receiver more than `capacity` events behind gets
//!   `RecvError::Lagged(n)` and resumes at the oldest retained event.

use tokio::sync::broadcast;

use super::event::Event;

/// Shared broadcast channel of lifecycle events. Cloning shares the channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to every current receiver.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// New independent receiver starting at the next published event.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn receivers_only_see_later_events() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::AllStopped));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::UnitStarting).with_unit("a"));

        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::UnitStarting);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn lagging_receiver_skips_oldest() {
        let bus = Bus::new(2);
        let mut rx = bus.subscribe();
        for id in ["a", "b", "c"] {
            bus.publish(Event::new(EventKind::UnitStarting).with_unit(id));
        }

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(1))
        ));
        assert_eq!(rx.try_recv().unwrap().unit.as_deref(), Some("b"));
    }
}
