//! # Loader abstraction.
//!
//! A [`Loader`] fetches one resource for a parameter payload. The transport
//! (HTTP, RPC, files, ...) lives entirely behind it. The shared handle type
//! is [`LoaderRef`], an `Arc<dyn Loader<T, P>>`.
//!
//! A loader receives a [`CancellationToken`] that may be signaled during or
//! after its execution. Checking it is optional: a result that arrives after
//! the signal is discarded by the orchestrator anyway.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Loaded;
use crate::error::LoadError;

/// Shared handle to a loader.
pub type LoaderRef<T, P> = Arc<dyn Loader<T, P>>;

/// # Asynchronous, cancelable fetch of one resource.
///
/// Implementations must not touch the store: the orchestrator commits the
/// returned [`Loaded`] (or the error) itself.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use loadvisor::{LoadError, Loaded, Loader};
///
/// struct Profile;
///
/// #[async_trait]
/// impl Loader<String, u64> for Profile {
///     fn name(&self) -> &str { "profile" }
///
///     async fn load(&self, id: u64, ctx: CancellationToken) -> Result<Loaded<String, u64>, LoadError> {
///         if ctx.is_cancelled() {
///             return Err(LoadError::Canceled);
///         }
///         Ok(Loaded::success(format!("user-{id}")).with_params(id))
///     }
/// }
/// ```
#[async_trait]
pub trait Loader<T, P>: Send + Sync + 'static {
    /// Human-readable name (for events/logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Loads the resource for `params`.
    ///
    /// `Err` (and a panic) count as the loader raising: the entry becomes
    /// `ERROR` with the configured generic message.
    async fn load(&self, params: P, ctx: CancellationToken) -> Result<Loaded<T, P>, LoadError>;
}
