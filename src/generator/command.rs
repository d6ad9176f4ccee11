// src/generator/command.rs

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::errors::{LabrunError, Result};
use crate::exec::process::spawn_command;
use crate::generator::{BuildCompletion, GeneratorFuture, PatternGenerator, PendingBuild};

/// Generator driven through its command-line interface.
///
/// Every operation runs `<command..> <op> --config <path> [flags..]` with
/// inherited stdio.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    leading_args: Vec<String>,
    config_path: PathBuf,
}

impl CommandGenerator {
    pub fn new(command: &[String], config_path: impl Into<PathBuf>) -> Result<Self> {
        let (program, leading_args) = command.split_first().ok_or_else(|| {
            LabrunError::ConfigError("generator command must not be empty".to_string())
        })?;

        Ok(Self {
            program: program.clone(),
            leading_args: leading_args.to_vec(),
            config_path: config_path.into(),
        })
    }

    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Self::new(&cfg.runner().generator.command, cfg.source_path())
    }

    /// Full argument vector for `op` followed by `extra`.
    pub fn args_for(&self, op: &str, extra: &[&str]) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.push(op.to_string());
        args.push("--config".to_string());
        args.push(self.config_path.to_string_lossy().into_owned());
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    /// Spawn the child now and return a handle resolving on its exit.
    fn spawn_pending(&self, op: &str, args: Vec<String>) -> Result<BuildCompletion> {
        let mut child = spawn_command(&self.program, &args)?;
        let label = format!("{} {}", self.program, op);
        debug!(command = %label, "generator child spawned");

        Ok(BuildCompletion::Pending(PendingBuild::new(async move {
            let status = child.wait().await?;
            if status.success() {
                Ok(())
            } else {
                Err(LabrunError::GeneratorError(format!(
                    "`{label}` exited with {status}"
                )))
            }
        })))
    }

    async fn run(&self, op: &str, extra: &[&str]) -> Result<()> {
        let args = self.args_for(op, extra);
        info!(program = %self.program, op = %op, "running generator");
        let mut child = spawn_command(&self.program, &args)?;
        let status = child.wait().await?;

        if status.success() {
            Ok(())
        } else {
            Err(LabrunError::GeneratorError(format!(
                "`{} {}` exited with {}",
                self.program, op, status
            )))
        }
    }
}

fn clean_flag(clean: bool) -> Option<&'static str> {
    clean.then_some("--clean")
}

impl PatternGenerator for CommandGenerator {
    fn build(&self, clean: bool) -> Result<BuildCompletion> {
        let extra: Vec<&str> = clean_flag(clean).into_iter().collect();
        self.spawn_pending("build", self.args_for("build", &extra))
    }

    fn patterns_only(&self, clean: bool) -> Result<BuildCompletion> {
        let mut extra = vec!["--patterns-only"];
        extra.extend(clean_flag(clean));
        self.spawn_pending("build", self.args_for("build", &extra))
    }

    fn version(&self) -> GeneratorFuture<'_, ()> {
        Box::pin(self.run("version", &[]))
    }

    fn help(&self) -> GeneratorFuture<'_, ()> {
        Box::pin(self.run("help", &[]))
    }

    fn list_starterkits(&self) -> GeneratorFuture<'_, ()> {
        Box::pin(self.run("liststarterkits", &[]))
    }

    fn load_starterkit<'a>(&'a self, kit: &'a str, clean: bool) -> GeneratorFuture<'a, ()> {
        Box::pin(async move {
            let mut extra = vec!["--kit", kit];
            extra.extend(clean_flag(clean));
            self.run("loadstarterkit", &extra).await
        })
    }

    fn install_plugin<'a>(&'a self, plugin: &'a str) -> GeneratorFuture<'a, ()> {
        Box::pin(async move { self.run("installplugin", &["--plugin", plugin]).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_include_config_and_flags() {
        let generator = CommandGenerator::new(
            &["npx".to_string(), "patternlab".to_string()],
            "conf/patternlab-config.json",
        )
        .unwrap();

        assert_eq!(
            generator.args_for("build", &["--clean"]),
            vec![
                "patternlab",
                "build",
                "--config",
                "conf/patternlab-config.json",
                "--clean"
            ]
        );
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = CommandGenerator::new(&[], "x.json").unwrap_err();
        assert!(matches!(err, LabrunError::ConfigError(_)));
    }
}
