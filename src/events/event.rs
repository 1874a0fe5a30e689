//! # Events emitted by the store and the orchestrator.
//!
//! [`EventKind`] falls into three groups:
//! - **Store events**: a mutation was applied (state set, status set, removed, aborted)
//! - **Load events**: the orchestrator's decisions and outcomes for one load
//! - **Subscriber events**: fan-out problems (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! resource name, sub-key, status and reasons.
//!
//! ## Ordering
//! `seq` is process-wide and strictly increasing. Subscriber lanes may deliver
//! out of order relative to each other; compare `seq` to tell which came first.
//!
//! ## Example
//! ```rust
//! use loadvisor::{Event, EventKind, Status};
//!
//! let ev = Event::new(EventKind::LoadFailed)
//!     .with_resource("user")
//!     .with_status(Status::Error)
//!     .with_reason("not found");
//!
//! assert_eq!(ev.kind, EventKind::LoadFailed);
//! assert_eq!(ev.resource.as_deref(), Some("user"));
//! assert_eq!(ev.reason.as_deref(), Some("not found"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::store::{Address, Status};

/// Next `seq` to hand out.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// What an [`Event`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Store events ===
    /// An entry was replaced wholesale.
    ///
    /// Sets: `resource`, `sub` (map stores), `status`, `key` (if any)
    StateSet,

    /// An entry's status was set, other fields kept.
    ///
    /// Sets: `resource`, `sub`, `status`
    StatusSet,

    /// One entry was removed.
    ///
    /// Sets: `resource`, `sub`
    EntryRemoved,

    /// Every sub-key under a name was removed (wildcard remove).
    ///
    /// Sets: `resource`
    BucketRemoved,

    /// An `IN_PROGRESS` entry was reset to `INIT`.
    ///
    /// Sets: `resource`, `sub`, `status = INIT`
    Aborted,

    // === Load events ===
    /// A load was admitted and `IN_PROGRESS` committed.
    ///
    /// Sets: `resource`, `sub`, `key`, `reason` = loader name
    LoadStarted,

    /// A load was skipped because another one is `IN_PROGRESS`.
    LoadDeduplicated,

    /// A load was skipped because its token was already signaled.
    LoadCancelled,

    /// `initial_load` found the entry already loaded for this key.
    LoadUpToDate,

    /// Loader resolved with `success: true`; `SUCCESS` committed.
    LoadSucceeded,

    /// Loader resolved with `success: false` or returned `LoadError::Failed`;
    /// `ERROR` committed with the loader's message.
    ///
    /// Sets: `reason` = loader message (if any)
    LoadFailed,

    /// Loader raised or panicked; `ERROR` committed with the generic message.
    ///
    /// Sets: `reason` = original error text (not stored on the entry)
    LoadRaised,

    /// Token was signaled while the loader was pending; result dropped.
    LoadDiscarded,

    // === Subscriber events ===
    /// A subscriber's `on_event` panicked.
    ///
    /// Sets: `resource` = subscriber name, `reason` = panic info
    SubscriberPanicked,

    /// An event was dropped for one subscriber.
    ///
    /// Sets: `resource` = subscriber name, `reason` = "full" / "closed"
    SubscriberOverflow,
}

/// One published event. Which optional fields are set depends on `kind`.
#[derive(Clone, Debug)]
pub struct Event {
    /// Process-wide sequence number.
    pub seq: u64,
    /// Publication time.
    pub at: SystemTime,
    /// What happened.
    pub kind: EventKind,
    /// Resource name, if applicable.
    pub resource: Option<Arc<str>>,
    /// Sub-key (map stores only).
    pub sub: Option<Arc<str>>,
    /// Status after the event, if it changed one.
    pub status: Option<Status>,
    /// Identity key of the load or entry.
    pub key: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, loader name, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Event of `kind`, stamped with the next `seq` and the current time.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            resource: None,
            sub: None,
            status: None,
            key: None,
            reason: None,
        }
    }

    /// Creates an event for the entry at `addr`.
    pub fn at_address<A: Address>(kind: EventKind, addr: &A) -> Self {
        let mut ev = Event::new(kind);
        ev.resource = Some(Arc::clone(addr.name()));
        ev.sub = addr.sub_label().cloned();
        ev
    }

    /// Attaches a resource name.
    #[inline]
    pub fn with_resource(mut self, name: impl Into<Arc<str>>) -> Self {
        self.resource = Some(name.into());
        self
    }

    /// Attaches a sub-key.
    #[inline]
    pub fn with_sub(mut self, sub: impl Into<Arc<str>>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Attaches a status.
    #[inline]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches an identity key, if any.
    #[inline]
    pub fn with_key(mut self, key: Option<&str>) -> Self {
        self.key = key.map(Arc::from);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_resource(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_resource(subscriber)
            .with_reason(info)
    }

    /// True for events that describe a store mutation.
    #[inline]
    pub fn is_store_mutation(&self) -> bool {
        matches!(
            self.kind,
            EventKind::StateSet
                | EventKind::StatusSet
                | EventKind::EntryRemoved
                | EventKind::BucketRemoved
                | EventKind::Aborted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ByName, ByNameKey};

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::StateSet);
        let b = Event::new(EventKind::StateSet);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn address_fills_resource_and_sub() {
        let single = Event::at_address(EventKind::StatusSet, &ByName::new("user"));
        assert_eq!(single.resource.as_deref(), Some("user"));
        assert!(single.sub.is_none());

        let keyed = Event::at_address(EventKind::Aborted, &ByNameKey::new("list", "p1"));
        assert_eq!(keyed.resource.as_deref(), Some("list"));
        assert_eq!(keyed.sub.as_deref(), Some("p1"));
        assert!(keyed.is_store_mutation());
    }
}
