//! # Orchestrator: dedup, cancellation and commit of resource loads.
//!
//! The [`Orchestrator`] sits on top of one [`Store`] and drives each entry
//! through its state machine. It owns no state of its own besides the store
//! handle; cancellation tokens belong to the observers that start loads.
//!
//! ## Load flow
//! ```text
//! initial_load(args)
//!   ├─► token signaled?                         → Cancelled
//!   ├─► status == INIT, or (single-key only)
//!   │   args.key != entry.key?                  → load(args)
//!   └─► otherwise                               → UpToDate
//!
//! load(args)
//!   ├─► token signaled?                         → Cancelled
//!   ├─► Store::begin_load (check + IN_PROGRESS, one lock)
//!   │     └─ already IN_PROGRESS                → Deduplicated
//!   ├─► loader.load(params, child token)  ◄── only suspension point
//!   ├─► token signaled meanwhile?               → Discarded (no commit)
//!   └─► set_state:
//!         Ok(success)  → SUCCESS {resource, key, params, message}
//!         Ok(!success) → ERROR   {resource, key, params, message}
//!         Err(Failed)  → ERROR   {key, message}
//!         Err / panic  → ERROR   {message: cfg.failure_message}
//! ```
//!
//! ## Rules
//! - Everything before and after the loader await is synchronous; the dedup
//!   check and the `IN_PROGRESS` commit are a single store operation.
//! - Loader errors are committed, never returned or re-raised.
//! - The subscriber listener stops on [`Orchestrator::shutdown`] or when the
//!   last clone of the orchestrator is dropped.
//! - Cancelling a token never touches stored status; the observer issues
//!   [`Store::abort`] for that.
//! - `dispatch_*` variants perform the synchronous part on the caller's
//!   thread and spawn only the loader await + commit, so a second dispatch
//!   issued right after the first already observes `IN_PROGRESS`.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::args::{LoadArgs, LoadOutcome};
use super::builder::OrchestratorBuilder;
use super::runner::run_loader;
use super::session::{Session, SessionOptions};
use crate::config::Config;
use crate::error::LoadError;
use crate::events::{Bus, Event, EventKind};
use crate::loaders::LoaderRef;
use crate::store::{Address, Entry, Status, Store};
use crate::subscribers::SubscriberSet;

/// Load orchestrator over a store addressed by `A`.
///
/// Cheap to clone: every clone shares the same store and subscribers.
pub struct Orchestrator<A: Address, T, P> {
    cfg: Arc<Config>,
    store: Arc<Store<A, T, P>>,
    subs: Arc<SubscriberSet>,
    listener: CancellationToken,
    _last_clone: Arc<DropGuard>,
}

impl<A: Address, T, P> Clone for Orchestrator<A, T, P> {
    fn clone(&self) -> Self {
        Self {
            cfg: Arc::clone(&self.cfg),
            store: Arc::clone(&self.store),
            subs: Arc::clone(&self.subs),
            listener: self.listener.clone(),
            _last_clone: Arc::clone(&self._last_clone),
        }
    }
}

/// Result of the synchronous half of a load.
enum Start<A: Address, T, P> {
    Skipped(LoadOutcome),
    Begun(InFlight<A, T, P>),
}

/// An admitted load whose entry is already `IN_PROGRESS`.
struct InFlight<A: Address, T, P> {
    orchestrator: Orchestrator<A, T, P>,
    args: LoadArgs<A, T, P>,
}

impl<A: Address, T, P> Orchestrator<A, T, P> {
    /// Starts building an orchestrator with its own fresh store.
    pub fn builder(cfg: Config) -> OrchestratorBuilder<A, T, P> {
        OrchestratorBuilder::new(cfg)
    }

    /// Orchestrator with a fresh store and no subscribers.
    pub fn new(cfg: Config) -> Self {
        OrchestratorBuilder::new(cfg).build()
    }

    pub(crate) fn from_parts(
        cfg: Config,
        store: Arc<Store<A, T, P>>,
        subs: Arc<SubscriberSet>,
    ) -> Self {
        let listener = CancellationToken::new();
        Self {
            cfg: Arc::new(cfg),
            store,
            subs,
            _last_clone: Arc::new(listener.clone().drop_guard()),
            listener,
        }
    }

    /// The store this orchestrator commits to (read side for observers).
    pub fn store(&self) -> &Arc<Store<A, T, P>> {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Stops forwarding events to subscribers.
    ///
    /// The store keeps working; only the fan-out listener exits.
    pub fn shutdown(&self) {
        self.listener.cancel();
    }

    /// Forwards bus events to the subscriber set until [`shutdown`](Self::shutdown)
    /// or until the last orchestrator clone is dropped.
    ///
    /// The task holds no orchestrator clone, so it cannot keep itself alive.
    pub(crate) fn spawn_subscriber_listener(&self) {
        let mut rx = self.store.subscribe();
        let set = Arc::clone(&self.subs);
        let stop = self.listener.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        });
    }

    fn bus(&self) -> &Bus {
        self.store.bus()
    }
}

impl<A, T, P> Orchestrator<A, T, P>
where
    A: Address,
    T: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    /// Current entry at `addr` (default `{status: INIT}` if absent).
    pub fn get(&self, addr: &A) -> Entry<T, P> {
        self.store.get(addr)
    }

    /// Loads only if needed: the entry is `INIT`, or (single-key stores) the
    /// caller's key differs from the recorded one.
    pub async fn initial_load(&self, args: LoadArgs<A, T, P>) -> LoadOutcome {
        match self.start_initial(args) {
            Start::Skipped(outcome) => outcome,
            Start::Begun(pending) => pending.finish().await,
        }
    }

    /// Loads unless a load for the same entry is already `IN_PROGRESS`.
    pub async fn load(&self, args: LoadArgs<A, T, P>) -> LoadOutcome {
        match self.start(args) {
            Start::Skipped(outcome) => outcome,
            Start::Begun(pending) => pending.finish().await,
        }
    }

    /// [`initial_load`](Self::initial_load) with the loader await spawned.
    ///
    /// Returns `None` if no load started. Must be called within a tokio runtime.
    pub fn dispatch_initial_load(
        &self,
        args: LoadArgs<A, T, P>,
    ) -> Option<JoinHandle<LoadOutcome>> {
        match self.start_initial(args) {
            Start::Skipped(_) => None,
            Start::Begun(pending) => Some(tokio::spawn(pending.finish())),
        }
    }

    /// [`load`](Self::load) with the loader await spawned.
    ///
    /// Returns `None` if no load started. Must be called within a tokio runtime.
    pub fn dispatch_load(&self, args: LoadArgs<A, T, P>) -> Option<JoinHandle<LoadOutcome>> {
        match self.start(args) {
            Start::Skipped(_) => None,
            Start::Begun(pending) => Some(tokio::spawn(pending.finish())),
        }
    }

    /// Observer session for one entry.
    pub fn session(
        &self,
        address: A,
        loader: LoaderRef<T, P>,
        options: SessionOptions<P>,
    ) -> Session<A, T, P> {
        Session::new(self.clone(), address, loader, options)
    }

    fn start_initial(&self, args: LoadArgs<A, T, P>) -> Start<A, T, P> {
        if args.is_cancelled() {
            return self.skip(&args, EventKind::LoadCancelled, LoadOutcome::Cancelled);
        }

        let status = self.store.status(&args.address);
        let key_changed = A::RELOAD_ON_KEY_CHANGE
            && args.key.is_some()
            && args.key != self.store.key(&args.address);

        if status == Status::Init || key_changed {
            self.start(args)
        } else {
            self.skip(&args, EventKind::LoadUpToDate, LoadOutcome::UpToDate)
        }
    }

    fn start(&self, args: LoadArgs<A, T, P>) -> Start<A, T, P> {
        if args.is_cancelled() {
            return self.skip(&args, EventKind::LoadCancelled, LoadOutcome::Cancelled);
        }
        if !self.store.begin_load(&args.address) {
            return self.skip(&args, EventKind::LoadDeduplicated, LoadOutcome::Deduplicated);
        }

        self.bus().publish(
            Event::at_address(EventKind::LoadStarted, &args.address)
                .with_key(args.key.as_deref())
                .with_reason(args.loader.name()),
        );
        Start::Begun(InFlight {
            orchestrator: self.clone(),
            args,
        })
    }

    fn skip(
        &self,
        args: &LoadArgs<A, T, P>,
        kind: EventKind,
        outcome: LoadOutcome,
    ) -> Start<A, T, P> {
        self.bus()
            .publish(Event::at_address(kind, &args.address).with_key(args.key.as_deref()));
        Start::Skipped(outcome)
    }
}

impl<A, T, P> InFlight<A, T, P>
where
    A: Address,
    T: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    async fn finish(self) -> LoadOutcome {
        let InFlight { orchestrator, args } = self;
        let LoadArgs {
            address,
            params,
            loader,
            key,
            token,
        } = args;
        let token = token.unwrap_or_default();

        let res = run_loader(&*loader, params, &token).await;

        let bus = orchestrator.bus();
        if token.is_cancelled() {
            bus.publish(
                Event::at_address(EventKind::LoadDiscarded, &address).with_key(key.as_deref()),
            );
            return LoadOutcome::Discarded;
        }

        let (entry, ev) = match res {
            Ok(loaded) => {
                let kind = if loaded.success {
                    EventKind::LoadSucceeded
                } else {
                    EventKind::LoadFailed
                };
                let mut ev = Event::at_address(kind, &address)
                    .with_status(loaded.status())
                    .with_key(key.as_deref());
                if let Some(message) = loaded.message.as_deref() {
                    ev = ev.with_reason(message);
                }
                (loaded.into_entry(key), ev)
            }
            Err(LoadError::Failed { message }) => {
                let ev = Event::at_address(EventKind::LoadFailed, &address)
                    .with_status(Status::Error)
                    .with_key(key.as_deref())
                    .with_reason(message.as_str());
                (Entry { key, ..Entry::error(message) }, ev)
            }
            Err(err) => {
                let ev = Event::at_address(EventKind::LoadRaised, &address)
                    .with_status(Status::Error)
                    .with_key(key.as_deref())
                    .with_reason(err.to_string());
                (Entry::error(orchestrator.cfg.failure_message.clone()), ev)
            }
        };

        let status = entry.status;
        orchestrator.store.set_state(&address, entry);
        bus.publish(ev);
        LoadOutcome::Committed(status)
    }
}
