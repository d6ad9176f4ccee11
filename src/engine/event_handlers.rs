// src/engine/event_handlers.rs

//! Per-event transition logic for the core runtime.

use std::time::Duration;

use crate::engine::core::{SubscriptionEntry, SubscriptionState};
use crate::types::TaskName;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Send `SettleElapsed { subscription, generation }` after `after`.
    ScheduleSettle {
        subscription: String,
        generation: u64,
        after: Duration,
    },
    /// Run `tasks` in series for `subscription`, then report completion.
    RunReaction {
        subscription: String,
        tasks: Vec<TaskName>,
    },
    /// Stop the runtime loop.
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    pub fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn idle() -> Self {
        Self::continue_with(Vec::new())
    }
}

fn start_debounce(name: &str, entry: &mut SubscriptionEntry, settle: Duration) -> CoreCommand {
    entry.generation += 1;
    entry.state = SubscriptionState::Debouncing {
        generation: entry.generation,
    };
    CoreCommand::ScheduleSettle {
        subscription: name.to_string(),
        generation: entry.generation,
        after: settle,
    }
}

/// A matching file changed.
///
/// - `Idle` / `Debouncing`: (re)start the quiet period.
/// - `Running`: remember one follow-up run.
pub fn handle_change(name: &str, entry: &mut SubscriptionEntry, settle: Duration) -> CoreStep {
    match entry.state {
        SubscriptionState::Idle | SubscriptionState::Debouncing { .. } => {
            CoreStep::continue_with(vec![start_debounce(name, entry, settle)])
        }
        SubscriptionState::Running { .. } => {
            entry.state = SubscriptionState::Running { queued: true };
            CoreStep::idle()
        }
    }
}

/// A settle timer fired. Only the most recent generation starts a run.
pub fn handle_settle(name: &str, entry: &mut SubscriptionEntry, generation: u64) -> CoreStep {
    match entry.state {
        SubscriptionState::Debouncing { generation: current } if current == generation => {
            entry.state = SubscriptionState::Running { queued: false };
            CoreStep::continue_with(vec![CoreCommand::RunReaction {
                subscription: name.to_string(),
                tasks: entry.reaction.clone(),
            }])
        }
        _ => CoreStep::idle(),
    }
}

/// The reaction finished (successfully or not).
pub fn handle_completion(name: &str, entry: &mut SubscriptionEntry, settle: Duration) -> CoreStep {
    match entry.state {
        SubscriptionState::Running { queued: true } => {
            CoreStep::continue_with(vec![start_debounce(name, entry, settle)])
        }
        SubscriptionState::Running { queued: false } => {
            entry.state = SubscriptionState::Idle;
            CoreStep::idle()
        }
        // Completion without a run in flight: nothing to do.
        _ => CoreStep::idle(),
    }
}
