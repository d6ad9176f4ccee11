// src/engine/mod.rs

//! Watch reaction engine.
//!
//! File changes arrive per subscription; each subscription debounces them
//! (quiet period), then runs its reaction series, and coalesces changes that
//! arrive mid-run into a single follow-up run.
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::TaskOutcome;

/// Events flowing into the runtime from the watcher, timers and reactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A watched path matching `subscription` was created or modified.
    ChangeDetected { subscription: String, path: String },
    /// The settle timer scheduled for `generation` fired.
    SettleElapsed { subscription: String, generation: u64 },
    /// The reaction series of `subscription` finished.
    ReactionCompleted {
        subscription: String,
        outcome: TaskOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::{CoreRuntime, SubscriptionState};
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
