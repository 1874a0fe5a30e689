//! # Broadcast bus shared by a store and its orchestrator.
//!
//! ```text
//! Store::set_* / remove / abort ─┐
//! Orchestrator load decisions ───┼──► Bus ──┬──► orchestrator listener ──► SubscriberSet
//! SubscriberSet overflow/panic ──┘          └──► Store::subscribe()
//! ```
//!
//! Publishing never blocks and never fails. With no receiver the event is
//! dropped; a receiver that falls more than `capacity` events behind gets
//! `RecvError::Lagged` and resumes at the oldest retained event.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable handle to one broadcast channel of [`Event`]s.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Bus retaining up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to the current receivers, if any.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Bus::new(crate::Config::default().bus_capacity_clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test(flavor = "current_thread")]
    async fn delivers_to_every_receiver() {
        let bus = Bus::new(0);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(Event::new(EventKind::LoadStarted).with_resource("user"));

        assert_eq!(a.recv().await.map(|e| e.kind).ok(), Some(EventKind::LoadStarted));
        assert_eq!(b.recv().await.map(|e| e.kind).ok(), Some(EventKind::LoadStarted));
    }

    #[test]
    fn publish_without_receivers_is_silent() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::Aborted));
    }
}
