//! # Example: Observer sessions over a slow resource
//!
//! Two views observe the same `profile` entry:
//! - the first mounts, starts the load, then goes away before it resolves;
//! - the second mounts afterwards and gets the data.
//!
//! Run with logging:
//! `RUST_LOG=loadvisor=debug cargo run --example observer_session --features logging`

use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

use loadvisor::{
    ByName, Config, LoadError, Loaded, LoaderFn, LoaderRef, Orchestrator, SessionOptions,
    StatusTracker, Subscribe,
};

#[derive(Debug, Clone)]
struct Profile {
    id: u32,
    name: String,
}

fn profile_loader() -> LoaderRef<Profile, u32> {
    LoaderFn::arc("profile_api", |id: u32, ctx: CancellationToken| async move {
        tokio::select! {
            _ = ctx.cancelled() => return Err(LoadError::Canceled),
            _ = tokio::time::sleep(Duration::from_millis(300)) => {}
        }
        if id == 0 {
            return Ok::<Loaded<Profile, u32>, LoadError>(Loaded::failure("no such profile"));
        }
        Ok(Loaded::success(Profile {
            id,
            name: format!("profile-{id}"),
        })
        .with_params(id))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let tracker = Arc::new(StatusTracker::new());
    #[allow(unused_mut)]
    let mut subs: Vec<Arc<dyn Subscribe>> = vec![tracker.clone() as Arc<dyn Subscribe>];
    #[cfg(feature = "logging")]
    subs.push(Arc::new(loadvisor::LogWriter));

    let orch: Orchestrator<ByName, Profile, u32> = Orchestrator::builder(Config::default())
        .with_subscribers(subs)
        .build();
    let profile = ByName::new("profile");

    // First view: leaves before the load resolves.
    let mut impatient = orch.session(
        profile.clone(),
        profile_loader(),
        SessionOptions::auto_load(7).with_key("7"),
    );
    let stale = impatient.mount();
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(impatient);
    println!("[impatient] gone, status = {}", orch.store().status(&profile));

    if let Some(h) = stale {
        println!("[impatient] load ended as {:?}", h.await?);
    }

    // Second view: stays until the data arrives.
    let mut patient = orch.session(
        profile.clone(),
        profile_loader(),
        SessionOptions::auto_load(7).with_key("7"),
    );
    if let Some(h) = patient.mount() {
        println!("[patient] load ended as {:?}", h.await?);
    }
    let entry = patient.entry();
    if let Some(p) = entry.resource.as_ref() {
        println!("[patient] {} -> {} ({})", entry.status, p.name, p.id);
    }

    // Explicit reload with a missing profile: the entry is replaced by the failure.
    if let Some(h) = patient.load_data(0) {
        h.await?;
    }
    let entry = patient.entry();
    println!(
        "[patient] reload -> {} ({:?})",
        entry.status, entry.message
    );
    patient.unmount();

    tokio::time::sleep(Duration::from_millis(20)).await;
    println!(
        "[tracker] profile = {}",
        tracker.status("profile", None).await
    );

    orch.shutdown();
    Ok(())
}
