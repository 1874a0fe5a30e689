//! # Entry store: data model and keyed storage.
//!
//! - [`Status`] the four load states
//! - [`Entry`] the tracked record of one resource
//! - [`Address`] where an entry lives ([`ByName`], [`ByNameKey`])
//! - [`Store`] the generic keyed store, aliased as [`SingleKeyStore`] and [`MapKeyStore`]

mod address;
mod entry;
mod status;
#[allow(clippy::module_inception)]
mod store;

pub use address::{Address, ByName, ByNameKey, WILDCARD};
pub use entry::Entry;
pub use status::Status;
pub use store::Store;

/// Store keyed by resource name alone.
pub type SingleKeyStore<T, P> = Store<ByName, T, P>;

/// Store keyed by resource name plus sub-key.
pub type MapKeyStore<T, P> = Store<ByNameKey, T, P>;
