//! # Function-backed loader (`LoaderFn`)
//!
//! [`LoaderFn`] wraps a closure `F: Fn(P, CancellationToken) -> Fut`, producing
//! a fresh future per load. No state is shared between invocations; if the
//! closure needs a client or cache, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use loadvisor::{LoadError, Loaded, LoaderFn, LoaderRef};
//!
//! let users: LoaderRef<String, u32> = LoaderFn::arc("users", |id: u32, _ctx: CancellationToken| async move {
//!     Ok::<Loaded<String, u32>, LoadError>(Loaded::success(format!("user-{id}")))
//! });
//!
//! assert_eq!(users.name(), "users");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{Loaded, Loader};
use crate::error::LoadError;

/// Function-backed loader implementation.
#[derive(Debug)]
pub struct LoaderFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> LoaderFn<F> {
    /// Creates a new function-backed loader.
    ///
    /// Prefer [`LoaderFn::arc`] when you immediately need a [`LoaderRef`](crate::LoaderRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the loader and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut, T, P> Loader<T, P> for LoaderFn<F>
where
    F: Fn(P, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Loaded<T, P>, LoadError>> + Send + 'static,
    T: Send + 'static,
    P: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, params: P, ctx: CancellationToken) -> Result<Loaded<T, P>, LoadError> {
        (self.f)(params, ctx).await
    }
}
