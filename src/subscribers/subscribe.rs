//! # Subscriber contract.
//!
//! A [`Subscribe`] implementation receives every event published by the store
//! and the orchestrator, on its own worker task. It observes; the store is
//! never handed to it.

use async_trait::async_trait;

use crate::events::Event;

/// Handler for store and load events.
///
/// Runs on a worker owned by [`SubscriberSet`](crate::SubscriberSet), so a
/// slow handler only delays its own queue. When that queue is full, events for
/// this subscriber are dropped and a `SubscriberOverflow` event is published.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (minimum 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
