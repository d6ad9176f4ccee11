// src/types.rs

//! Small shared vocabulary types.

/// Canonical task name type used throughout the graph, engine and watcher.
pub type TaskName = String;

/// Outcome of a task (or a whole reaction sequence) as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(String),
}
