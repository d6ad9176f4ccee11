// src/tasks/mod.rs

//! Leaf task implementations and the context they share.

pub mod context;
pub mod copy;
pub mod generator;
pub mod serve;
pub mod sprite;
pub mod styles;
pub mod watch;

pub use context::{TaskArgs, TaskContext};
pub use copy::{AssetClass, CopySpec};
