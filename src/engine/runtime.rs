// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::core::CoreRuntime;
use crate::engine::{CoreCommand, RuntimeEvent};
use crate::errors::Result;
use crate::exec::ReactionBackend;
use crate::types::TaskOutcome;

/// Async shell around [`CoreRuntime`]: reads events, runs timers and hands
/// reactions to a [`ReactionBackend`].
pub struct Runtime<B: ReactionBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    /// Used by settle timers to feed `SettleElapsed` back in.
    event_tx: mpsc::Sender<RuntimeEvent>,
    backend: B,
}

impl<B: ReactionBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: ReactionBackend> Runtime<B> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        event_tx: mpsc::Sender<RuntimeEvent>,
        backend: B,
    ) -> Self {
        Self {
            core,
            event_rx,
            event_tx,
            backend,
        }
    }

    /// Main event loop; returns after `ShutdownRequested`.
    pub async fn run(mut self) -> Result<()> {
        info!("watch runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            if let RuntimeEvent::ReactionCompleted {
                subscription,
                outcome: TaskOutcome::Failed(reason),
            } = &event
            {
                warn!(subscription = %subscription, error = %reason, "reaction failed; still watching");
            }

            let step = self.core.step(event);
            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::ScheduleSettle {
                subscription,
                generation,
                after,
            } => {
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx
                        .send(RuntimeEvent::SettleElapsed {
                            subscription,
                            generation,
                        })
                        .await;
                });
            }
            CoreCommand::RunReaction {
                subscription,
                tasks,
            } => {
                info!(subscription = %subscription, ?tasks, "running reaction");
                self.backend.run_reaction(subscription, tasks).await?;
            }
            CoreCommand::RequestExit => {
                debug!("core issued RequestExit command");
            }
        }
        Ok(())
    }
}
