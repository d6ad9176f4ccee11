// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// The format follows the extension: `.toml` is read as TOML, anything else
/// as JSON. No semantic validation happens here; use [`load_and_validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents)?,
        _ => serde_json::from_str(&contents)?,
    };

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the entry point for the rest of the application:
///
/// - Reads JSON or TOML.
/// - Applies defaults for the `runner` section.
/// - Rejects empty paths, empty commands, unknown browser queries and
///   unusable watch settings.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config.with_source_path(path.as_ref()))
}
