//! Load orchestration core.
//!
//! The only public entry points are [`Orchestrator`] and the types its calls
//! take and return.
//!
//! Internal modules:
//! - [`orchestrator`]: dedup guard, cancellation checks, commits;
//! - [`runner`]: runs one loader call, folding errors and panics into `Result`;
//! - [`builder`]: wires store, bus and subscribers;
//! - [`session`]: observer lifecycle (mount/unmount) around one entry;
//! - [`args`]: `LoadArgs` and `LoadOutcome`.

mod args;
mod builder;
mod orchestrator;
mod runner;
mod session;


pub use args::{LoadArgs, LoadOutcome};
pub use builder::OrchestratorBuilder;
pub use orchestrator::Orchestrator;
pub use session::{Session, SessionOptions};

pub(crate) use runner::panic_message;
