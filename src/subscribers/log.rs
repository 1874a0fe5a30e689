//! # LogWriter: events as `tracing` records
//!
//! A subscriber that renders every [`Event`] as a structured `tracing` record
//! under the `loadvisor` target. Install any `tracing` subscriber (for
//! example `tracing_subscriber::fmt`) to see them.
//!
//! ## Levels
//! - `debug`: store mutations, dedup/skip decisions
//! - `info`: load started / succeeded / discarded
//! - `warn`: load failed or raised, subscriber overflow/panic

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let resource = e.resource.as_deref().unwrap_or("-");
        let sub = e.sub.as_deref().unwrap_or("-");
        let status = e.status.map(|s| s.as_str()).unwrap_or("-");
        let key = e.key.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::StateSet
            | EventKind::StatusSet
            | EventKind::EntryRemoved
            | EventKind::BucketRemoved
            | EventKind::Aborted => {
                tracing::debug!(target: "loadvisor", seq = e.seq, kind = ?e.kind, resource, sub, status, key, "store mutation");
            }
            EventKind::LoadDeduplicated | EventKind::LoadCancelled | EventKind::LoadUpToDate => {
                tracing::debug!(target: "loadvisor", seq = e.seq, kind = ?e.kind, resource, sub, key, "load skipped");
            }
            EventKind::LoadStarted => {
                tracing::info!(target: "loadvisor", seq = e.seq, resource, sub, key, loader = reason, "load started");
            }
            EventKind::LoadSucceeded => {
                tracing::info!(target: "loadvisor", seq = e.seq, resource, sub, key, "load succeeded");
            }
            EventKind::LoadDiscarded => {
                tracing::info!(target: "loadvisor", seq = e.seq, resource, sub, key, "stale load result discarded");
            }
            EventKind::LoadFailed => {
                tracing::warn!(target: "loadvisor", seq = e.seq, resource, sub, key, message = reason, "load failed");
            }
            EventKind::LoadRaised => {
                tracing::warn!(target: "loadvisor", seq = e.seq, resource, sub, key, error = reason, "loader raised");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "loadvisor", subscriber = resource, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                tracing::warn!(target: "loadvisor", subscriber = resource, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
