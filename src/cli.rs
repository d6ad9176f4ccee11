// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `labrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "labrun",
    version,
    about = "Build, watch and serve a Pattern Lab style guide.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run (e.g. `patternlab:build`, `patternlab:serve`).
    #[arg(value_name = "TASK", default_value = "default")]
    pub task: String,

    /// Path to the project configuration file (JSON or TOML).
    #[arg(long, value_name = "PATH", default_value = "patternlab-config.json")]
    pub config: String,

    /// Starter kit name for `patternlab:loadstarterkit`.
    #[arg(long, value_name = "NAME")]
    pub kit: Option<String>,

    /// Ask the generator to clean its output first.
    #[arg(long)]
    pub clean: bool,

    /// Plugin name for `patternlab:installplugin`.
    #[arg(long, value_name = "NAME")]
    pub plugin: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides `LABRUN_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print every declared task and exit.
    #[arg(long)]
    pub list: bool,

    /// Print the execution plan of TASK without running anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
