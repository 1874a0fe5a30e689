//! # Loader abstractions.
//!
//! - [`Loader`] trait for async cancelable fetches
//! - [`LoaderFn`] closure-backed implementation
//! - [`LoaderRef`] shared reference to a loader (`Arc<dyn Loader<T, P>>`)
//! - [`Loaded`] the record a loader resolves with

mod loaded;
mod loader;
mod loader_fn;

pub use loaded::Loaded;
pub use loader::{Loader, LoaderRef};
pub use loader_fn::LoaderFn;
