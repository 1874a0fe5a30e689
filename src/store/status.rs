//! # Load status of a tracked resource.
//!
//! ```text
//! INIT ────start load────► IN_PROGRESS
//! IN_PROGRESS ──success──► SUCCESS
//! IN_PROGRESS ──failure──► ERROR
//! IN_PROGRESS ──abort────► INIT
//! SUCCESS/ERROR ──start load──► IN_PROGRESS   (reload)
//! ```
//!
//! There is no terminal state: `SUCCESS` and `ERROR` can both be reloaded.

use std::fmt;

/// Status of one entry. Absent entries read as [`Status::Init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Nothing loaded yet, or the last load was aborted.
    #[default]
    Init,
    /// A load is running; further loads are deduplicated.
    InProgress,
    /// Last load resolved with `success: true`.
    Success,
    /// Last load resolved with `success: false` or raised.
    Error,
}

impl Status {
    /// Returns the wire-style name (`"INIT"`, `"IN_PROGRESS"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Init => "INIT",
            Status::InProgress => "IN_PROGRESS",
            Status::Success => "SUCCESS",
            Status::Error => "ERROR",
        }
    }

    /// True while a load is running.
    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::InProgress)
    }

    /// True once a load has resolved (either way).
    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self, Status::Success | Status::Error)
    }

    /// Whether the orchestrator may move an entry from `self` to `next`.
    ///
    /// `set_state` replaces entries wholesale and does not consult this; the
    /// dedup guard asserts it in debug builds.
    pub fn can_transition_to(&self, next: Status) -> bool {
        match (self, next) {
            (Status::InProgress, Status::InProgress) => false,
            (_, Status::InProgress) => true,
            (Status::InProgress, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
