//! # Run a single loader invocation.
//!
//! Executes one call of a [`Loader`] and folds every way it can end into a
//! `Result`:
//!
//! ```text
//! loader.load() → Ok(Loaded)      → Ok(Loaded)        (success or LoadFailure)
//! loader.load() → Err(LoadError)  → Err(LoadError)    (LoadException)
//! loader.load() → panic           → Err(Panicked)     (LoadException)
//! ```
//!
//! ## Rules
//! - Never panics and never re-raises: the orchestrator turns `Err` into an `ERROR` entry
//! - The loader gets a **child token**: it can observe the caller's signal but
//!   cancelling it does not reach the caller's token

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;
use crate::loaders::{Loaded, Loader};

/// Invokes `loader` once, catching panics.
pub(crate) async fn run_loader<T: Send + 'static, P: Send + 'static>(
    loader: &dyn Loader<T, P>,
    params: P,
    parent: &CancellationToken,
) -> Result<Loaded<T, P>, LoadError> {
    let child = parent.child_token();
    match AssertUnwindSafe(loader.load(params, child)).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => Err(LoadError::Panicked {
            info: panic_message(&*panic),
        }),
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{LoaderFn, LoaderRef};

    #[tokio::test(flavor = "current_thread")]
    async fn passes_results_through() {
        let ok: LoaderRef<u8, u8> =
            LoaderFn::arc("ok", |n: u8, _ctx: CancellationToken| async move {
                Ok::<Loaded<u8, u8>, LoadError>(Loaded::success(n * 2))
            });
        let res = run_loader(&*ok, 21, &CancellationToken::new()).await;
        assert_eq!(res, Ok(Loaded::success(42)));

        let err: LoaderRef<u8, u8> =
            LoaderFn::arc("err", |_: u8, _ctx: CancellationToken| async move {
                Err::<Loaded<u8, u8>, LoadError>(LoadError::raised("timeout"))
            });
        let res = run_loader(&*err, 0, &CancellationToken::new()).await;
        assert_eq!(res, Err(LoadError::raised("timeout")));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn panic_becomes_error() {
        let boom: LoaderRef<(), bool> =
            LoaderFn::arc("boom", |fail: bool, _ctx: CancellationToken| async move {
                if fail {
                    panic!("decoder exploded");
                }
                Ok::<Loaded<(), bool>, LoadError>(Loaded::success(()))
            });
        let res = run_loader(&*boom, true, &CancellationToken::new()).await;
        assert_eq!(
            res,
            Err(LoadError::Panicked {
                info: "decoder exploded".into()
            })
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn loader_sees_parent_signal_but_cannot_cancel_it() {
        let parent = CancellationToken::new();
        let rogue: LoaderRef<(), ()> =
            LoaderFn::arc("rogue", |_: (), ctx: CancellationToken| async move {
                ctx.cancel();
                Ok::<Loaded<(), ()>, LoadError>(Loaded::success(()))
            });
        let _ = run_loader(&*rogue, (), &parent).await;
        assert!(!parent.is_cancelled());

        parent.cancel();
        let polite: LoaderRef<(), ()> =
            LoaderFn::arc("polite", |_: (), ctx: CancellationToken| async move {
                if ctx.is_cancelled() {
                    return Err(LoadError::Canceled);
                }
                Ok::<Loaded<(), ()>, LoadError>(Loaded::success(()))
            });
        assert_eq!(
            run_loader(&*polite, (), &parent).await,
            Err(LoadError::Canceled)
        );
    }
}
