// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LabrunError, Result};
use crate::styles::prefix::browsers_from_queries;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LabrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_commands(cfg)?;
    validate_browsers(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    let source = &cfg.paths.source;
    let public = &cfg.paths.public;

    let entries = [
        ("paths.source.root", &source.root),
        ("paths.source.patterns", &source.patterns),
        ("paths.source.data", &source.data),
        ("paths.source.meta", &source.meta),
        ("paths.source.annotations", &source.annotations),
        ("paths.source.styleguide", &source.styleguide),
        ("paths.source.js", &source.js),
        ("paths.source.images", &source.images),
        ("paths.source.fonts", &source.fonts),
        ("paths.source.css", &source.css),
        ("paths.public.root", &public.root),
        ("paths.public.styleguide", &public.styleguide),
        ("paths.public.js", &public.js),
        ("paths.public.images", &public.images),
        ("paths.public.fonts", &public.fonts),
        ("paths.public.css", &public.css),
        ("runner.styles.entries", &cfg.runner.styles.entries),
        ("runner.sprite.source", &cfg.runner.sprite.source),
        ("runner.sprite.sprite", &cfg.runner.sprite.sprite),
        ("runner.sprite.partial", &cfg.runner.sprite.partial),
    ];

    for (key, value) in entries {
        if value.trim().is_empty() {
            return Err(LabrunError::ConfigError(format!(
                "`{key}` must not be empty"
            )));
        }
    }

    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    let commands = [
        ("runner.styles.compiler", &cfg.runner.styles.compiler),
        ("runner.generator.command", &cfg.runner.generator.command),
    ];

    for (key, command) in commands {
        match command.first() {
            Some(program) if !program.trim().is_empty() => {}
            _ => {
                return Err(LabrunError::ConfigError(format!(
                    "`{key}` must name a program to run"
                )));
            }
        }
    }

    Ok(())
}

fn validate_browsers(cfg: &RawConfigFile) -> Result<()> {
    match browsers_from_queries(&cfg.runner.styles.browsers) {
        Ok(_) => Ok(()),
        Err(LabrunError::ConfigError(msg)) => Err(LabrunError::ConfigError(format!(
            "`runner.styles.browsers`: {msg}"
        ))),
        Err(other) => Err(other),
    }
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    let watch = &cfg.runner.watch;

    if watch.await_write_finish_ms == 0 {
        return Err(LabrunError::ConfigError(
            "`runner.watch.awaitWriteFinishMs` must be >= 1 (got 0)".to_string(),
        ));
    }

    for ext in &watch.template_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(LabrunError::ConfigError(format!(
                "template extension '{ext}' must start with '.'"
            )));
        }
    }

    Ok(())
}
