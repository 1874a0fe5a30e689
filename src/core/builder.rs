use std::sync::Arc;

use crate::{
    config::Config,
    events::Bus,
    store::{Address, Store},
    subscribers::{Subscribe, SubscriberSet},
};

use super::orchestrator::Orchestrator;

/// Builder for constructing an [`Orchestrator`] with optional subscribers
/// or a pre-existing store.
pub struct OrchestratorBuilder<A: Address, T, P> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    store: Option<Arc<Store<A, T, P>>>,
}

impl<A: Address, T, P> OrchestratorBuilder<A, T, P> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            store: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive store and load events through dedicated workers
    /// with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Commits into an existing store instead of creating one.
    ///
    /// Events then flow over that store's bus; `Config::bus_capacity` is ignored.
    pub fn with_store(mut self, store: Arc<Store<A, T, P>>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds and returns the orchestrator.
    ///
    /// With subscribers configured this spawns their workers and the fan-out
    /// listener, so it must then run within a tokio runtime. Without
    /// subscribers nothing is spawned.
    pub fn build(self) -> Orchestrator<A, T, P> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(Store::new(Bus::new(self.cfg.bus_capacity_clamped()))));
        let has_subscribers = !self.subscribers.is_empty();
        let subs = Arc::new(SubscriberSet::new(self.subscribers, store.bus().clone()));

        let orchestrator = Orchestrator::from_parts(self.cfg, store, subs);
        if has_subscribers {
            orchestrator.spawn_subscriber_listener();
        }
        orchestrator
    }
}
