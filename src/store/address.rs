//! # Addresses: where an entry lives in a store.
//!
//! One store implementation serves both shapes of key:
//!
//! ```text
//! ByName("user")                 → HashMap["user"][()]
//! ByNameKey("list", "page-1")    → HashMap["list"]["page-1"]
//! ByNameKey("list", WILDCARD)    → HashMap["list"]         (remove only)
//! ```
//!
//! The two shapes also differ in how `initial_load` treats an identity key,
//! which is carried by [`Address::RELOAD_ON_KEY_CHANGE`].

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Reserved sub-key that makes `remove` drop every sub-key of a name.
pub const WILDCARD: &str = "all";

/// Locates one entry inside a [`Store`](crate::Store).
pub trait Address: Clone + fmt::Debug + Send + Sync + 'static {
    /// Second-level key. `()` for single-key stores.
    type Sub: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Whether `initial_load` starts a load when the caller's identity key
    /// differs from the one recorded on the entry.
    ///
    /// `true` for [`ByName`]; `false` for [`ByNameKey`], whose sub-key already
    /// identifies the parameterization.
    const RELOAD_ON_KEY_CHANGE: bool;

    /// Resource name (first-level key).
    fn name(&self) -> &Arc<str>;

    /// Sub-key (second-level key).
    fn sub(&self) -> &Self::Sub;

    /// True if this address targets every sub-key under its name.
    fn is_wildcard(&self) -> bool {
        false
    }

    /// Sub-key rendered for events and logs.
    fn sub_label(&self) -> Option<&Arc<str>> {
        None
    }
}

/// Address in a single-key store: the resource name alone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByName {
    name: Arc<str>,
}

impl ByName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for ByName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Address for ByName {
    type Sub = ();

    const RELOAD_ON_KEY_CHANGE: bool = true;

    fn name(&self) -> &Arc<str> {
        &self.name
    }

    fn sub(&self) -> &() {
        &()
    }
}

/// Address in a map store: resource name plus sub-key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByNameKey {
    name: Arc<str>,
    sub: Arc<str>,
}

impl ByNameKey {
    pub fn new(name: impl Into<Arc<str>>, sub: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            sub: sub.into(),
        }
    }

    /// Wildcard address covering every sub-key of `name`.
    pub fn all(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, WILDCARD)
    }
}

impl From<(&str, &str)> for ByNameKey {
    fn from((name, sub): (&str, &str)) -> Self {
        Self::new(name, sub)
    }
}

impl Address for ByNameKey {
    type Sub = Arc<str>;

    const RELOAD_ON_KEY_CHANGE: bool = false;

    fn name(&self) -> &Arc<str> {
        &self.name
    }

    fn sub(&self) -> &Arc<str> {
        &self.sub
    }

    fn is_wildcard(&self) -> bool {
        &*self.sub == WILDCARD
    }

    fn sub_label(&self) -> Option<&Arc<str>> {
        Some(&self.sub)
    }
}
