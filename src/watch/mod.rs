// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Declaring the watch subscriptions and their reaction series.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Turning raw events into `RuntimeEvent::ChangeDetected`.
//!
//! Debouncing and serialising reactions is the engine's job.

pub mod event_handler;
pub mod path_utils;
pub mod subscriptions;
pub mod watcher;

pub use subscriptions::{Subscription, build_subscriptions, watch_roots};
pub use watcher::{WatcherHandle, spawn_watcher};
