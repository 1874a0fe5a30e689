//! # Observer-side status mirror with sequence-based ordering.
//!
//! [`StatusTracker`] follows store events and keeps the last known status of
//! every (name[, sub-key]), using event sequence numbers to handle
//! out-of-order delivery through subscriber queues.
//!
//! ## Architecture
//! ```text
//! Store ──► Bus ──► subscriber_listener() ──► SubscriberSet ──► StatusTracker::on_event()
//!                                                                     │
//!                                                                     ▼
//!                                               HashMap<(name, sub), {seq, status}>
//! ```
//!
//! ## Rules
//! - Only store events change the mirror (`StateSet`, `StatusSet`, `Aborted`,
//!   `EntryRemoved`, `BucketRemoved`)
//! - Reads are **eventually consistent**; the store is authoritative
//! - Events with `seq <= last_seq` for the same slot are **rejected** (stale)

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::events::{Event, EventKind};
use crate::store::Status;
use crate::subscribers::Subscribe;

type Slot = (Arc<str>, Option<Arc<str>>);

#[derive(Debug, Clone, Copy)]
struct Tracked {
    last_seq: u64,
    status: Status,
}

/// Mirror of entry statuses built from events.
#[derive(Default)]
pub struct StatusTracker {
    state: RwLock<HashMap<Slot, Tracked>>,
}

impl StatusTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event; returns whether the mirror changed.
    ///
    /// ```text
    /// update(StateSet SUCCESS, seq=100) → status=SUCCESS, last_seq=100
    /// update(StatusSet IN_PROGRESS, seq=99) → rejected (stale)
    /// ```
    pub async fn update(&self, ev: &Event) -> bool {
        let Some(name) = ev.resource.clone() else {
            return false;
        };

        let mut state = self.state.write().await;
        match ev.kind {
            EventKind::StateSet | EventKind::StatusSet | EventKind::Aborted => {
                let Some(status) = ev.status else {
                    return false;
                };
                let slot = state.entry((name, ev.sub.clone())).or_insert(Tracked {
                    last_seq: 0,
                    status: Status::Init,
                });
                if ev.seq <= slot.last_seq {
                    return false;
                }
                slot.last_seq = ev.seq;
                slot.status = status;
                true
            }
            EventKind::EntryRemoved => state.remove(&(name, ev.sub.clone())).is_some(),
            EventKind::BucketRemoved => {
                let before = state.len();
                state.retain(|(n, _), _| *n != name);
                state.len() != before
            }
            _ => false,
        }
    }

    /// Last mirrored status of (name, sub); `INIT` if unknown.
    pub async fn status(&self, name: &str, sub: Option<&str>) -> Status {
        let key: Slot = (Arc::from(name), sub.map(Arc::from));
        self.state
            .read()
            .await
            .get(&key)
            .map(|t| t.status)
            .unwrap_or_default()
    }

    /// Sorted list of slots currently mirrored as `IN_PROGRESS`.
    pub async fn in_progress(&self) -> Vec<(String, Option<String>)> {
        let state = self.state.read().await;
        let mut loading: Vec<(String, Option<String>)> = state
            .iter()
            .filter(|(_, t)| t.status.is_loading())
            .map(|((name, sub), _)| (name.to_string(), sub.as_deref().map(str::to_string)))
            .collect();
        loading.sort_unstable();
        loading
    }
}

#[async_trait]
impl Subscribe for StatusTracker {
    async fn on_event(&self, event: &Event) {
        self.update(event).await;
    }

    fn name(&self) -> &'static str {
        "status_tracker"
    }
}
