// src/tasks/watch.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::RunnerBackend;
use crate::graph::Runner;
use crate::watch::{build_subscriptions, spawn_watcher};

/// `watch-files`: watch the source trees and run narrow reactions until
/// Ctrl-C (or [`TaskContext::request_shutdown`](crate::tasks::TaskContext::request_shutdown)).
pub async fn watch_files(runner: &Runner) -> Result<()> {
    let ctx = runner.context();
    let subscriptions = build_subscriptions(ctx.config(), ctx.cwd())?;
    let settle = Duration::from_millis(ctx.config().runner().watch.await_write_finish_ms);

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);

    let core = CoreRuntime::new(
        subscriptions
            .iter()
            .map(|s| (s.name().to_string(), s.reaction().to_vec())),
        settle,
    );

    let handle = spawn_watcher(ctx.cwd(), subscriptions, tx.clone())?;
    info!(roots = handle.roots().len(), settle_ms = settle.as_millis() as u64, "watching for changes");

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for Ctrl+C");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Programmatic shutdown.
    {
        let tx = tx.clone();
        let mut signal = ctx.shutdown_signal();
        tokio::spawn(async move {
            loop {
                if *signal.borrow_and_update() {
                    let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
                    return;
                }
                if signal.changed().await.is_err() {
                    return;
                }
            }
        });
    }

    let backend = RunnerBackend::new(runner.clone(), tx.clone());
    let result = Runtime::new(core, rx, tx, backend).run().await;

    drop(handle);
    result
}
