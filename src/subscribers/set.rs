//! # Fan-out of bus events to subscribers.
//!
//! [`SubscriberSet`] gives every [`Subscribe`] implementation its own lane:
//! a bounded queue drained by a dedicated worker task.
//!
//! ```text
//! emit(ev) ─┬─► lane "status_tracker" [mpsc] ─► worker ─► on_event
//!           ├─► lane "log_writer"     [mpsc] ─► worker ─► on_event
//!           └─► lane ...
//!                    │ full / closed              │ panic
//!                    ▼                            ▼
//!           SubscriberOverflow on Bus     SubscriberPanicked on Bus
//! ```
//!
//! ## Rules
//! - `emit` never waits: a full lane drops the event for that lane only.
//! - Each lane is FIFO; lanes are not ordered relative to each other.
//! - A panicking subscriber keeps its lane alive and gets the next event.
//! - Overflow reports are not re-reported when they overflow themselves.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Sending half of one subscriber's lane.
struct Lane {
    subscriber: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Subscribers of one orchestrator, each behind its own queue and worker.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber; problems are reported on `bus`.
    ///
    /// Must be called within a tokio runtime when `subs` is not empty.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (lanes, workers) = subs
            .into_iter()
            .map(|sub| spawn_lane(sub, bus.clone()))
            .unzip();
        Self { lanes, workers, bus }
    }

    /// Queues a copy of `event` on every lane.
    pub fn emit(&self, event: &Event) {
        if self.lanes.is_empty() {
            return;
        }
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Queues a shared event on every lane.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let report = event.kind != EventKind::SubscriberOverflow;

        for lane in &self.lanes {
            let reason = match lane.tx.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            if report {
                self.bus
                    .publish(Event::subscriber_overflow(lane.subscriber, reason));
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Closes every lane and waits until the workers have drained them.
    pub async fn shutdown(self) {
        let SubscriberSet { lanes, workers, .. } = self;
        drop(lanes);
        for worker in workers {
            let _ = worker.await;
        }
    }
}

fn spawn_lane(sub: Arc<dyn Subscribe>, bus: Bus) -> (Lane, JoinHandle<()>) {
    let subscriber = sub.name();
    let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));

    let worker = tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
            if let Err(payload) = handled {
                let info = crate::core::panic_message(&*payload);
                bus.publish(Event::subscriber_panicked(subscriber, info));
            }
        }
    });
    (Lane { subscriber, tx }, worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().await.push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicky;

    #[async_trait]
    impl Subscribe for Panicky {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "panicky"
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn delivers_in_order_and_shuts_down() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![rec.clone()], Bus::new(8));
        assert_eq!(set.len(), 1);

        set.emit(&Event::new(EventKind::LoadStarted));
        set.emit(&Event::new(EventKind::LoadSucceeded));
        set.shutdown().await;

        assert_eq!(
            *rec.seen.lock().await,
            vec![EventKind::LoadStarted, EventKind::LoadSucceeded]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn panic_is_reported_on_bus() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panicky)], bus);

        set.emit(&Event::new(EventKind::LoadStarted));
        set.shutdown().await;

        let ev = rx.recv().await.expect("panic event");
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.resource.as_deref(), Some("panicky"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
    }
}
