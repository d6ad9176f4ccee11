// src/logging.rs

//! `tracing` setup for the binary.
//!
//! `--log-level` wins when given. Otherwise `LABRUN_LOG` is read as a full
//! `EnvFilter` directive list (`"debug"`, `"labrun::watch=trace,info"`), and
//! `info` is used when neither is set. Output goes to stderr; stdout belongs
//! to the generator and the style compiler.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "LABRUN_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed or
/// `LABRUN_LOG` does not parse.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))
}

pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level.directive()));
    }

    match env.map(str::trim).filter(|spec| !spec.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec).with_context(|| format!("invalid {LOG_ENV} '{spec}'")),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}
