// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! Consumes [`RuntimeEvent`]s and produces an updated state plus the
//! [`CoreCommand`]s the IO shell should execute. No Tokio, channels,
//! filesystem or processes, so every transition is unit-testable.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::engine::RuntimeEvent;
use crate::engine::event_handlers::{
    CoreCommand, CoreStep, handle_change, handle_completion, handle_settle,
};
use crate::types::TaskName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Idle,
    /// Waiting for writes to settle; only the timer for `generation` counts.
    Debouncing { generation: u64 },
    /// Reaction in flight; `queued` records a change seen meanwhile.
    Running { queued: bool },
}

#[derive(Debug, Clone)]
pub struct SubscriptionEntry {
    pub(crate) reaction: Vec<TaskName>,
    pub(crate) state: SubscriptionState,
    pub(crate) generation: u64,
}

#[derive(Debug)]
pub struct CoreRuntime {
    subscriptions: BTreeMap<String, SubscriptionEntry>,
    settle: Duration,
}

impl CoreRuntime {
    /// `subscriptions` yields `(name, reaction series)` pairs.
    pub fn new<I>(subscriptions: I, settle: Duration) -> Self
    where
        I: IntoIterator<Item = (String, Vec<TaskName>)>,
    {
        let subscriptions = subscriptions
            .into_iter()
            .map(|(name, reaction)| {
                (
                    name,
                    SubscriptionEntry {
                        reaction,
                        state: SubscriptionState::Idle,
                        generation: 0,
                    },
                )
            })
            .collect();

        Self {
            subscriptions,
            settle,
        }
    }

    pub fn state_of(&self, subscription: &str) -> Option<SubscriptionState> {
        self.subscriptions.get(subscription).map(|e| e.state)
    }

    pub fn is_idle(&self) -> bool {
        self.subscriptions
            .values()
            .all(|e| e.state == SubscriptionState::Idle)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        let settle = self.settle;

        match event {
            RuntimeEvent::ChangeDetected { subscription, .. } => {
                match self.subscriptions.get_mut(&subscription) {
                    Some(entry) => handle_change(&subscription, entry, settle),
                    None => CoreStep::idle(),
                }
            }
            RuntimeEvent::SettleElapsed {
                subscription,
                generation,
            } => match self.subscriptions.get_mut(&subscription) {
                Some(entry) => handle_settle(&subscription, entry, generation),
                None => CoreStep::idle(),
            },
            RuntimeEvent::ReactionCompleted { subscription, .. } => {
                match self.subscriptions.get_mut(&subscription) {
                    Some(entry) => handle_completion(&subscription, entry, settle),
                    None => CoreStep::idle(),
                }
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: vec![CoreCommand::RequestExit],
                keep_running: false,
            },
        }
    }
}
