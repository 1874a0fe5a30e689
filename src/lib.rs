//! # loadvisor
//!
//! **Loadvisor** tracks the client-side state of asynchronously loaded remote
//! resources. It deduplicates concurrent loads, supports cooperative
//! cancellation, and exposes one status record per resource (or per
//! resource × sub-key) to observers.
//!
//! The transport is not its business: loads go through a caller-supplied
//! [`Loader`], and results land in an in-memory [`Store`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Observer (Session)        Observer (Session)        Observer (raw)
//!   mount / unmount           load_data                 Store::get
//!          │                        │                        ▲
//!          ▼                        ▼                        │
//! ┌───────────────────────────────────────────────────┐      │
//! │  Orchestrator                                     │      │
//! │  - initial_load / load (+ dispatch_* variants)    │      │
//! │  - dedup guard (Store::begin_load)                │      │
//! │  - cancellation checks before start / after await │      │
//! └──────┬─────────────────────────────┬──────────────┘      │
//!        │ loader.load(params, token)  │ set_status / set_state
//!        ▼                             ▼                     │
//!   ┌──────────┐              ┌──────────────────────────────┴─┐
//!   │  Loader  │              │  Store<A, T, P>                │
//!   │ (HTTP,   │              │  name ─► (sub-key ─►) Entry    │
//!   │  RPC..)  │              │  set_state / set_status /      │
//!   └──────────┘              │  remove / abort                │
//!                             └──────────────┬─────────────────┘
//!                                            │ publish(Event)
//!                                            ▼
//!                               Bus (broadcast) ──► SubscriberSet
//!                                                   ├─► StatusTracker
//!                                                   ├─► LogWriter (feature "logging")
//!                                                   └─► custom Subscribe
//! ```
//!
//! ### Entry state machine
//! ```text
//! INIT ────start load────► IN_PROGRESS ──success──► SUCCESS
//!   ▲                          │  │                    │
//!   └──────────abort───────────┘  └──failure──► ERROR  │
//!                                                 │    │
//!              IN_PROGRESS ◄──── reload ──────────┴────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                         |
//! |-------------------|-----------------------------------------------------------------|--------------------------------------------|
//! | **Store**         | Entries keyed by name, or by name + sub-key, one implementation | [`Store`], [`SingleKeyStore`], [`MapKeyStore`] |
//! | **Orchestration** | Load-if-needed, dedup, cancellation, commit                     | [`Orchestrator`], [`LoadArgs`], [`LoadOutcome`] |
//! | **Loaders**       | Async cancelable fetch, as trait or closure                     | [`Loader`], [`LoaderFn`], [`Loaded`]       |
//! | **Observers**     | Mount/unmount lifecycle around one entry                        | [`Session`], [`SessionOptions`]            |
//! | **Events**        | Every mutation and load decision, broadcast                     | [`Event`], [`EventKind`], [`Subscribe`]    |
//! | **Errors**        | Loader errors, absorbed into `ERROR` entries                    | [`LoadError`]                              |
//! | **Configuration** | Bus capacity, generic failure message                           | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use loadvisor::{ByName, Config, LoadArgs, LoadError, LoadOutcome, Loaded, LoaderFn, LoaderRef, Orchestrator, Status};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let orchestrator: Orchestrator<ByName, String, u32> = Orchestrator::new(Config::default());
//!
//!     let users: LoaderRef<String, u32> = LoaderFn::arc("users", |id: u32, _ctx: CancellationToken| async move {
//!         Ok::<Loaded<String, u32>, LoadError>(Loaded::success(format!("user-{id}")).with_params(id))
//!     });
//!
//!     let user = ByName::new("user");
//!     let outcome = orchestrator
//!         .initial_load(LoadArgs::new(user.clone(), 1, users.clone()).with_key("1"))
//!         .await;
//!     assert_eq!(outcome, LoadOutcome::Committed(Status::Success));
//!
//!     // Same key again: nothing to do.
//!     let again = orchestrator
//!         .initial_load(LoadArgs::new(user.clone(), 1, users).with_key("1"))
//!         .await;
//!     assert_eq!(again, LoadOutcome::UpToDate);
//!
//!     let entry = orchestrator.get(&user);
//!     assert_eq!(entry.status, Status::Success);
//!     assert_eq!(entry.resource.as_deref(), Some("user-1"));
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod loaders;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_FAILURE_MESSAGE};
pub use crate::core::{
    LoadArgs, LoadOutcome, Orchestrator, OrchestratorBuilder, Session, SessionOptions,
};
pub use error::LoadError;
pub use events::{Bus, Event, EventKind};
pub use loaders::{Loaded, Loader, LoaderFn, LoaderRef};
pub use store::{
    Address, ByName, ByNameKey, Entry, MapKeyStore, SingleKeyStore, Status, Store, WILDCARD,
};
pub use subscribers::{StatusTracker, Subscribe, SubscriberSet};

// Optional: expose a built-in `tracing` subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

/// Orchestrator over a single-key store.
pub type ResourceOrchestrator<T, P> = Orchestrator<ByName, T, P>;

/// Orchestrator over a map store.
pub type ResourceMapOrchestrator<T, P> = Orchestrator<ByNameKey, T, P>;
