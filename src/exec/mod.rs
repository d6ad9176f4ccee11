// src/exec/mod.rs

//! Execution layer.
//!
//! - [`process`] wraps `tokio::process::Command` for the external tools
//!   (style compiler, generator).
//! - [`backend`] provides the `ReactionBackend` trait and the production
//!   `RunnerBackend` the watch runtime uses; tests replace it with a fake.

pub mod backend;
pub mod process;

pub use backend::{ReactionBackend, RunnerBackend};
