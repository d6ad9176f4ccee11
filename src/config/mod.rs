// src/config/mod.rs

//! Configuration loading and validation for labrun.
//!
//! Responsibilities:
//! - Define the JSON/TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into an immutable [`ConfigFile`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    ConfigFile, GeneratorSection, PathsSection, PublicPaths, RawConfigFile, RunnerSection,
    ServerSection, SourcePaths, SpriteSection, StylesSection, WatchSection,
};
