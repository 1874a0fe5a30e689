//! # Orchestrator configuration.
//!
//! [`Config`] holds the few knobs of the load orchestrator: the capacity of the
//! event bus shared by the store and the orchestrator, and the generic message
//! written into an `ERROR` entry when a loader raises.
//!
//! ```text
//! Config ─► Bus::new(bus_capacity) ─► Store ─► Orchestrator
//!        └► failure_message ─────────────────► ERROR commits
//! ```
//!
//! ```
//! use loadvisor::Config;
//!
//! let cfg = Config {
//!     bus_capacity: 256,
//!     failure_message: "could not load".into(),
//! };
//!
//! assert_eq!(cfg.bus_capacity_clamped(), 256);
//! ```

use std::borrow::Cow;

/// Message stored on an entry when its loader raised or panicked.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Some error occurred during loading data.";

/// Configuration for an [`Orchestrator`](crate::Orchestrator) and its store.
///
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)
/// - `failure_message`: text committed with `ERROR` when the loader raises
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of events the bus retains for its slowest receiver.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Generic text stored in `Entry::message` after a loader raised.
    ///
    /// The loader's error detail is not copied into the entry;
    /// it is only reported through [`EventKind::LoadRaised`](crate::EventKind).
    pub failure_message: Cow<'static, str>,
}

impl Config {
    /// `bus_capacity`, at least 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// 1024 retained events and [`DEFAULT_FAILURE_MESSAGE`].
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            failure_message: Cow::Borrowed(DEFAULT_FAILURE_MESSAGE),
        }
    }
}
