//! # Load arguments and outcomes.

use tokio_util::sync::CancellationToken;

use crate::loaders::LoaderRef;
use crate::store::Status;

/// Everything one `initial_load`/`load` call needs.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use loadvisor::{ByName, LoadArgs, LoadError, Loaded, LoaderFn, LoaderRef};
///
/// let loader: LoaderRef<u32, ()> = LoaderFn::arc("answer", |_: (), _ctx: CancellationToken| async {
///     Ok::<Loaded<u32, ()>, LoadError>(Loaded::success(42))
/// });
///
/// let token = CancellationToken::new();
/// let args = LoadArgs::new(ByName::new("answer"), (), loader)
///     .with_key("v1")
///     .with_token(token.clone());
/// assert_eq!(args.key.as_deref(), Some("v1"));
/// ```
pub struct LoadArgs<A, T, P> {
    /// Entry the load commits to.
    pub address: A,
    /// Parameters handed to the loader.
    pub params: P,
    /// Loader to invoke.
    pub loader: LoaderRef<T, P>,
    /// Identity of this parameterization, recorded on the committed entry.
    pub key: Option<String>,
    /// Cooperative cancellation, owned by the observer that started the load.
    pub token: Option<CancellationToken>,
}

impl<A, T, P> LoadArgs<A, T, P> {
    pub fn new(address: A, params: P, loader: LoaderRef<T, P>) -> Self {
        Self {
            address,
            params,
            loader,
            key: None,
            token: None,
        }
    }

    #[inline]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[inline]
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// True if the caller's token is already signaled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// What an `initial_load`/`load` call ended up doing.
///
/// Purely informational: failures are in the store, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Token was signaled before the load could start; nothing changed.
    Cancelled,
    /// Another load for the same entry is `IN_PROGRESS`; nothing changed.
    Deduplicated,
    /// `initial_load` found the entry loaded for this key; nothing changed.
    UpToDate,
    /// The loader resolved and this status was committed.
    Committed(Status),
    /// Token was signaled while the loader was pending; result dropped,
    /// entry left `IN_PROGRESS` for the observer's `abort`.
    Discarded,
}

impl LoadOutcome {
    /// True if the loader ran and the result reached the store.
    #[inline]
    pub fn is_committed(&self) -> bool {
        matches!(self, LoadOutcome::Committed(_))
    }
}
