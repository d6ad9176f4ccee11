// src/exec/process.rs

//! Thin wrappers over `tokio::process::Command` for the external tools the
//! runner drives (the style compiler and the pattern-library generator).

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program args..` to completion, optionally feeding `stdin`, and
/// capture stdout / stderr.
pub async fn run_command(
    program: &str,
    args: &[String],
    stdin: Option<Vec<u8>>,
) -> Result<CommandOutput> {
    debug!(program = %program, args = ?args, "running command");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{program}'"))?;

    // Feed stdin concurrently so a chatty child cannot deadlock on a full
    // stdout pipe while we are still writing.
    let writer = match (stdin, child.stdin.take()) {
        (Some(data), Some(mut pipe)) => Some(tokio::spawn(async move {
            let result = pipe.write_all(&data).await;
            drop(pipe);
            result
        })),
        _ => None,
    };

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for '{program}'"))?;

    if let Some(writer) = writer {
        writer
            .await
            .context("joining stdin writer")?
            .with_context(|| format!("writing stdin of '{program}'"))?;
    }

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Spawn `program args..` with inherited stdio and return the child.
///
/// The child is killed if the handle is dropped before it exits.
pub fn spawn_command(program: &str, args: &[String]) -> Result<Child> {
    debug!(program = %program, args = ?args, "spawning command");

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning '{program}'"))
}
