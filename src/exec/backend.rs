// src/exec/backend.rs

//! Pluggable reaction backend.
//!
//! The runtime talks to a `ReactionBackend` instead of the task runner
//! directly, so tests can swap in a fake that records dispatched reactions
//! and completes them on demand.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::graph::Runner;
use crate::types::{TaskName, TaskOutcome};

/// Trait abstracting how reaction series are executed.
pub trait ReactionBackend: Send {
    /// Start `tasks` for `subscription`. Implementations must eventually
    /// send `RuntimeEvent::ReactionCompleted` for it.
    fn run_reaction(
        &mut self,
        subscription: String,
        tasks: Vec<TaskName>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: runs the series on the task [`Runner`] in a spawned
/// task so different subscriptions can overlap.
#[derive(Debug)]
pub struct RunnerBackend {
    runner: Runner,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RunnerBackend {
    pub fn new(runner: Runner, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { runner, runtime_tx }
    }
}

impl ReactionBackend for RunnerBackend {
    fn run_reaction(
        &mut self,
        subscription: String,
        tasks: Vec<TaskName>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let runner = self.runner.clone();
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let outcome = match runner.run_series(&tasks).await {
                    Ok(()) => TaskOutcome::Success,
                    Err(err) => TaskOutcome::Failed(err.to_string()),
                };
                debug!(subscription = %subscription, ?outcome, "reaction finished");
                let _ = tx
                    .send(RuntimeEvent::ReactionCompleted {
                        subscription,
                        outcome,
                    })
                    .await;
            });
            Ok(())
        })
    }
}
