// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::RuntimeEvent;
use crate::watch::event_handler::process_event;
use crate::watch::subscriptions::{Subscription, watch_roots};

/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl WatcherHandle {
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").field("roots", &self.roots).finish()
    }
}

/// Watch the base directories of all subscriptions and send
/// `RuntimeEvent::ChangeDetected` for every matching create / modify.
pub fn spawn_watcher(
    cwd: impl Into<PathBuf>,
    subscriptions: Vec<Subscription>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let cwd = cwd.into();
    let roots = watch_roots(&subscriptions, &cwd);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // The receiver only goes away at shutdown.
                let _ = event_tx.send(event);
            }
            Err(err) => error!(error = %err, "file watch error"),
        },
        Config::default(),
    )?;

    for root in &roots {
        watcher.watch(root, RecursiveMode::Recursive)?;
        info!(root = %root.display(), "watching");
    }

    let subscriptions = Arc::new(subscriptions);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            if !process_event(&cwd, event, &subscriptions, &runtime_tx).await {
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        roots,
    })
}
