//! # Keyed store of entries.
//!
//! [`Store`] owns every [`Entry`] and is the only shared mutable state of the
//! crate. One implementation serves both key shapes through [`Address`]:
//!
//! ```text
//! Store<ByName, T, P>     name ─► Entry            (SingleKeyStore)
//! Store<ByNameKey, T, P>  name ─► sub-key ─► Entry  (MapKeyStore)
//! ```
//!
//! ## Rules
//! - Reads are **total**: an absent entry reads as `{status: INIT}`.
//! - Each operation takes the write lock once, so it is atomic with respect
//!   to every other operation (the serialized-mutation channel).
//! - Every applied mutation publishes one [`Event`] on the store's [`Bus`],
//!   after the lock is released. No-op mutations publish nothing.
//! - No I/O happens under the lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use super::{Address, Entry, Status};
use crate::events::{Bus, Event, EventKind};

type Buckets<A, T, P> = HashMap<Arc<str>, HashMap<<A as Address>::Sub, Entry<T, P>>>;

/// In-memory store of entries addressed by `A`.
///
/// ## Example
/// ```rust
/// use loadvisor::{Bus, ByNameKey, Entry, MapKeyStore, Status};
///
/// let store: MapKeyStore<u32, ()> = MapKeyStore::new(Bus::new(16));
/// store.set_state(&ByNameKey::new("list", "p1"), Entry::success(1));
/// store.set_state(&ByNameKey::new("list", "p2"), Entry::success(2));
///
/// store.remove(&ByNameKey::new("list", "p1"));
/// assert_eq!(store.status(&ByNameKey::new("list", "p1")), Status::Init);
/// assert_eq!(store.status(&ByNameKey::new("list", "p2")), Status::Success);
///
/// store.remove(&ByNameKey::all("list"));
/// assert!(store.is_empty());
/// ```
pub struct Store<A: Address, T, P> {
    entries: RwLock<Buckets<A, T, P>>,
    bus: Bus,
}

impl<A: Address, T, P> Store<A, T, P> {
    /// Creates an empty store publishing its mutations on `bus`.
    pub fn new(bus: Bus) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            bus,
        }
    }

    /// Returns the current entry at `addr`, or the default `{status: INIT}`.
    pub fn get(&self, addr: &A) -> Entry<T, P>
    where
        T: Clone,
        P: Clone,
    {
        self.read()
            .get(addr.name().as_ref())
            .and_then(|bucket| bucket.get(addr.sub()))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the status at `addr` without cloning the entry.
    pub fn status(&self, addr: &A) -> Status {
        self.read()
            .get(addr.name().as_ref())
            .and_then(|bucket| bucket.get(addr.sub()))
            .map(|entry| entry.status)
            .unwrap_or_default()
    }

    /// Returns the identity key recorded at `addr`.
    pub fn key(&self, addr: &A) -> Option<String> {
        self.read()
            .get(addr.name().as_ref())
            .and_then(|bucket| bucket.get(addr.sub()))
            .and_then(|entry| entry.key.clone())
    }

    /// True if an entry is explicitly stored at `addr`.
    pub fn contains(&self, addr: &A) -> bool {
        self.read()
            .get(addr.name().as_ref())
            .is_some_and(|bucket| bucket.contains_key(addr.sub()))
    }

    /// Replaces the entry at `addr` wholesale.
    pub fn set_state(&self, addr: &A, entry: Entry<T, P>) {
        let status = entry.status;
        let key = entry.key.clone();
        {
            let mut entries = self.write();
            entries
                .entry(Arc::clone(addr.name()))
                .or_default()
                .insert(addr.sub().clone(), entry);
        }
        self.bus.publish(
            Event::at_address(EventKind::StateSet, addr)
                .with_status(status)
                .with_key(key.as_deref()),
        );
    }

    /// Sets the status at `addr`, keeping `resource`, `key`, `params` and
    /// `message` of an existing entry. Creates `{status}` if absent.
    pub fn set_status(&self, addr: &A, status: Status) {
        {
            let mut entries = self.write();
            Self::put_status(&mut entries, addr, status);
        }
        self.bus
            .publish(Event::at_address(EventKind::StatusSet, addr).with_status(status));
    }

    /// Removes the entry at `addr`.
    ///
    /// A wildcard address removes the whole bucket of its name. A concrete
    /// address removes one entry and leaves its siblings in place; a bucket
    /// left empty is dropped. Returns whether anything was removed.
    pub fn remove(&self, addr: &A) -> bool {
        let kind = {
            let mut entries = self.write();
            if addr.is_wildcard() {
                entries
                    .remove(addr.name().as_ref())
                    .map(|_| EventKind::BucketRemoved)
            } else {
                let name = addr.name().as_ref();
                let removed = entries
                    .get_mut(name)
                    .and_then(|bucket| bucket.remove(addr.sub()))
                    .is_some();
                if entries.get(name).is_some_and(HashMap::is_empty) {
                    entries.remove(name);
                }
                removed.then_some(EventKind::EntryRemoved)
            }
        };

        match kind {
            Some(EventKind::BucketRemoved) => {
                self.bus.publish(
                    Event::new(EventKind::BucketRemoved).with_resource(Arc::clone(addr.name())),
                );
                true
            }
            Some(kind) => {
                self.bus.publish(Event::at_address(kind, addr));
                true
            }
            None => false,
        }
    }

    /// Resets `IN_PROGRESS` to `INIT` at `addr`; no-op for any other status.
    ///
    /// An abort issued after the load resolved therefore cannot clobber a
    /// fresh `SUCCESS`/`ERROR`. Returns whether the status was reset.
    pub fn abort(&self, addr: &A) -> bool {
        let reset = {
            let mut entries = self.write();
            match entries
                .get_mut(addr.name().as_ref())
                .and_then(|bucket| bucket.get_mut(addr.sub()))
            {
                Some(entry) if entry.status == Status::InProgress => {
                    entry.status = Status::Init;
                    true
                }
                _ => false,
            }
        };
        if reset {
            self.bus
                .publish(Event::at_address(EventKind::Aborted, addr).with_status(Status::Init));
        }
        reset
    }

    /// Dedup guard: commits `IN_PROGRESS` unless the entry already is.
    ///
    /// Check and commit happen under one write lock, so two callers racing on
    /// different threads cannot both be admitted.
    pub(crate) fn begin_load(&self, addr: &A) -> bool {
        {
            let mut entries = self.write();
            let current = entries
                .get(addr.name().as_ref())
                .and_then(|bucket| bucket.get(addr.sub()))
                .map(|entry| entry.status)
                .unwrap_or_default();
            if current == Status::InProgress {
                return false;
            }
            debug_assert!(current.can_transition_to(Status::InProgress));
            Self::put_status(&mut entries, addr, Status::InProgress);
        }
        self.bus.publish(
            Event::at_address(EventKind::StatusSet, addr).with_status(Status::InProgress),
        );
        true
    }

    /// All entries stored under `name`, in no particular order.
    pub fn bucket(&self, name: &str) -> Vec<(A::Sub, Entry<T, P>)>
    where
        T: Clone,
        P: Clone,
    {
        self.read()
            .get(name)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(sub, entry)| (sub.clone(), entry.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorted list of resource names with at least one entry.
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of stored entries across all names.
    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    /// True if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Receiver of every subsequent store (and orchestrator) event.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }

    fn put_status(entries: &mut Buckets<A, T, P>, addr: &A, status: Status) {
        entries
            .entry(Arc::clone(addr.name()))
            .or_default()
            .entry(addr.sub().clone())
            .and_modify(|entry| entry.status = status)
            .or_insert_with(|| Entry::with_status(status));
    }

    fn read(&self) -> RwLockReadGuard<'_, Buckets<A, T, P>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Buckets<A, T, P>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Address, T, P> Default for Store<A, T, P> {
    fn default() -> Self {
        Self::new(Bus::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ByName, ByNameKey, MapKeyStore, SingleKeyStore};

    fn user() -> ByName {
        ByName::new("user")
    }

    #[test]
    fn unset_reads_as_init() {
        let single: SingleKeyStore<u32, ()> = Store::default();
        assert_eq!(single.get(&user()), Entry::default());
        assert!(!single.contains(&user()));

        let map: MapKeyStore<u32, ()> = Store::default();
        assert_eq!(map.get(&ByNameKey::new("list", "p1")), Entry::default());
    }

    #[test]
    fn set_status_keeps_last_good_data() {
        let store: SingleKeyStore<&'static str, u8> = Store::default();
        store.set_state(
            &user(),
            Entry::success("alice").with_key("a").with_params(7).with_message("ok"),
        );

        store.set_status(&user(), Status::InProgress);

        let entry = store.get(&user());
        assert_eq!(entry.status, Status::InProgress);
        assert_eq!(entry.resource, Some("alice"));
        assert_eq!(entry.key.as_deref(), Some("a"));
        assert_eq!(entry.params, Some(7));
        assert_eq!(entry.message.as_deref(), Some("ok"));
    }

    #[test]
    fn set_status_creates_bare_entry() {
        let store: MapKeyStore<u32, ()> = Store::default();
        let addr = ByNameKey::new("list", "p1");

        store.set_status(&addr, Status::InProgress);

        assert_eq!(store.get(&addr), Entry::with_status(Status::InProgress));
        assert!(store.contains(&addr));
    }

    #[test]
    fn abort_only_resets_in_progress() {
        let store: SingleKeyStore<u32, ()> = Store::default();

        assert!(!store.abort(&user()));
        assert!(!store.contains(&user()));

        store.set_state(&user(), Entry::success(1));
        assert!(!store.abort(&user()));
        assert_eq!(store.get(&user()), Entry::success(1));

        store.set_state(&user(), Entry::error("boom"));
        assert!(!store.abort(&user()));
        assert_eq!(store.status(&user()), Status::Error);

        store.set_status(&user(), Status::InProgress);
        assert!(store.abort(&user()));
        let entry = store.get(&user());
        assert_eq!(entry.status, Status::Init);
        assert_eq!(entry.message.as_deref(), Some("boom"));
    }

    #[test]
    fn remove_concrete_sub_key_leaves_siblings() {
        let store: MapKeyStore<(), ()> = Store::default();
        store.set_state(&ByNameKey::new("list", "p1"), Entry::with_status(Status::Success));
        store.set_state(&ByNameKey::new("list", "p2"), Entry::with_status(Status::Success));

        assert!(store.remove(&ByNameKey::new("list", "p1")));

        assert!(!store.contains(&ByNameKey::new("list", "p1")));
        assert_eq!(store.get(&ByNameKey::new("list", "p1")), Entry::default());
        assert_eq!(store.status(&ByNameKey::new("list", "p2")), Status::Success);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_wildcard_clears_every_sub_key() {
        let store: MapKeyStore<(), ()> = Store::default();
        for sub in ["p1", "p2", "p3"] {
            store.set_state(&ByNameKey::new("list", sub), Entry::with_status(Status::Success));
        }
        store.set_state(&ByNameKey::new("other", "p1"), Entry::with_status(Status::Error));

        assert!(store.remove(&ByNameKey::all("list")));

        assert!(store.bucket("list").is_empty());
        assert_eq!(store.names(), vec![Arc::<str>::from("other")]);
        assert_eq!(store.status(&ByNameKey::new("other", "p1")), Status::Error);
    }

    #[test]
    fn remove_absent_is_noop() {
        let store: SingleKeyStore<(), ()> = Store::default();
        assert!(!store.remove(&user()));
        assert!(store.is_empty());
    }

    #[test]
    fn begin_load_admits_once() {
        let store: SingleKeyStore<u32, ()> = Store::default();
        store.set_state(&user(), Entry::success(1));

        assert!(store.begin_load(&user()));
        assert!(!store.begin_load(&user()));
        assert_eq!(store.get(&user()).resource, Some(1));

        store.abort(&user());
        assert!(store.begin_load(&user()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn mutations_publish_events_and_noops_do_not() {
        let store: SingleKeyStore<u32, ()> = Store::new(Bus::new(16));
        let mut rx = store.subscribe();

        store.abort(&user());
        store.remove(&user());
        store.set_status(&user(), Status::InProgress);
        store.abort(&user());
        store.set_state(&user(), Entry::success(1).with_key("k"));
        store.remove(&user());

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.resource.as_deref(), Some("user"));
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::StatusSet,
                EventKind::Aborted,
                EventKind::StateSet,
                EventKind::EntryRemoved,
            ]
        );
    }
}
