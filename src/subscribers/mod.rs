//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling events broadcast through the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! Store / Orchestrator ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                          │
//!                                                    SubscriberSet::emit
//!                                              ┌───────────┼───────────┐
//!                                              ▼           ▼           ▼
//!                                        StatusTracker  LogWriter    Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use loadvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::LoadFailed | EventKind::LoadRaised) {
//!             // increment failure counter
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure_counter" }
//! }
//! ```

mod set;
mod subscribe;
mod tracker;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;
pub use tracker::StatusTracker;

#[cfg(feature = "logging")]
pub use log::LogWriter;
