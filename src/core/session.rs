//! # Observer session: the lifecycle around one entry.
//!
//! A [`Session`] is what a view, a connection handler or any other observer
//! holds while it is interested in one entry. It composes the two
//! cancellation mechanisms explicitly:
//!
//! ```text
//! mount()    ─► (auto_load) fresh token ─► dispatch_initial_load
//! load_data  ─► dispatch_load (no token, key unset)
//! entry()    ─► Store::get   (default entry when disconnected)
//! unmount()  ─► (auto_load)   token.cancel()  +  Store::abort
//!            └► (auto_remove) Store::remove
//! drop       ─► unmount()
//! ```
//!
//! Cancelling the token suppresses the stale commit of a pending load;
//! `abort` resets the stuck `IN_PROGRESS` so the next observer can load again.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::args::{LoadArgs, LoadOutcome};
use super::orchestrator::Orchestrator;
use crate::loaders::LoaderRef;
use crate::store::{Address, Entry, Status};

/// Behavior of a [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions<P> {
    /// Run `initial_load` on mount and abort on unmount.
    pub auto_load: bool,
    /// Parameters for the mount-time load.
    pub auto_load_params: P,
    /// Remove the entry on unmount.
    pub auto_remove: bool,
    /// Never read the store; `entry()` always returns the default.
    pub disconnected: bool,
    /// Identity key for the mount-time load.
    pub key: Option<String>,
}

impl<P> SessionOptions<P> {
    /// Options that load `params` on mount.
    pub fn auto_load(params: P) -> Self {
        Self {
            auto_load: true,
            auto_load_params: params,
            auto_remove: false,
            disconnected: false,
            key: None,
        }
    }

    #[inline]
    pub fn with_auto_remove(mut self, auto_remove: bool) -> Self {
        self.auto_remove = auto_remove;
        self
    }

    #[inline]
    pub fn with_disconnected(mut self, disconnected: bool) -> Self {
        self.disconnected = disconnected;
        self
    }

    #[inline]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// One observer's interest in one entry.
pub struct Session<A: Address, T, P> {
    orchestrator: Orchestrator<A, T, P>,
    address: A,
    loader: LoaderRef<T, P>,
    options: SessionOptions<P>,
    token: CancellationToken,
    mounted: bool,
}

impl<A: Address, T, P> Session<A, T, P> {
    pub(crate) fn new(
        orchestrator: Orchestrator<A, T, P>,
        address: A,
        loader: LoaderRef<T, P>,
        options: SessionOptions<P>,
    ) -> Self {
        Self {
            orchestrator,
            address,
            loader,
            options,
            token: CancellationToken::new(),
            mounted: false,
        }
    }

    /// Entry this session observes.
    pub fn address(&self) -> &A {
        &self.address
    }

    /// True between `mount` and `unmount`.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Status of the observed entry (`INIT` when disconnected).
    pub fn status(&self) -> Status {
        if self.options.disconnected {
            Status::Init
        } else {
            self.orchestrator.store().status(&self.address)
        }
    }

    /// Ends interest in the entry. Idempotent.
    ///
    /// With `auto_load`, signals the mount token and aborts a pending load;
    /// with `auto_remove`, removes the entry.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;

        let store = self.orchestrator.store();
        if self.options.auto_load {
            self.token.cancel();
            store.abort(&self.address);
        }
        if self.options.auto_remove {
            store.remove(&self.address);
        }
    }
}

impl<A, T, P> Session<A, T, P>
where
    A: Address,
    T: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    /// Starts interest in the entry; with `auto_load`, dispatches `initial_load`.
    ///
    /// Returns the spawned load, if one started. A session that is already
    /// mounted does nothing.
    pub fn mount(&mut self) -> Option<JoinHandle<LoadOutcome>> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        if !self.options.auto_load {
            return None;
        }

        self.token = CancellationToken::new();
        let mut args = LoadArgs::new(
            self.address.clone(),
            self.options.auto_load_params.clone(),
            self.loader.clone(),
        )
        .with_token(self.token.clone());
        args.key = self.options.key.clone();

        self.orchestrator.dispatch_initial_load(args)
    }

    /// Current entry (the default entry when disconnected).
    pub fn entry(&self) -> Entry<T, P> {
        if self.options.disconnected {
            Entry::default()
        } else {
            self.orchestrator.get(&self.address)
        }
    }

    /// Unconditional reload with `params`, not tied to the mount token.
    pub fn load_data(&self, params: P) -> Option<JoinHandle<LoadOutcome>> {
        self.orchestrator
            .dispatch_load(LoadArgs::new(self.address.clone(), params, self.loader.clone()))
    }
}

impl<A: Address, T, P> Drop for Session<A, T, P> {
    fn drop(&mut self) {
        self.unmount();
    }
}
