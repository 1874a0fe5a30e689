//! Events and the bus that carries them.
//!
//! - [`Event`] / [`EventKind`]: what happened, to which entry, with what status;
//! - [`Bus`]: the broadcast channel a store publishes on.
//!
//! Store mutations, orchestrator decisions and subscriber failures all travel
//! over the same bus, so `seq` orders them globally.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
