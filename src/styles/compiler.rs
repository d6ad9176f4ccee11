// src/styles/compiler.rs

use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::errors::{LabrunError, Result};
use crate::exec::process::run_command;

/// A style authoring error: reported, never fatal to the build.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{file}:{}:{} (status {status}): {message}", position(.line), position(.column))]
pub struct StyleCompileError {
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub status: i32,
    pub message: String,
}

impl StyleCompileError {
    /// Error without position information.
    pub fn other(file: &Path, status: i32, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string_lossy().into_owned(),
            line: None,
            column: None,
            status,
            message: message.into(),
        }
    }
}

fn position(value: &Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

pub type CompileFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<String, StyleCompileError>> + Send + 'a>>;

/// Compiles one (already glob-expanded) Sass entry into CSS.
///
/// The returned CSS ends with an inline `sourceMappingURL` comment when the
/// compiler emits one.
pub trait StyleCompiler: Send + Sync + Debug {
    fn compile<'a>(&'a self, source: String, file: &'a Path, load_path: &'a Path) -> CompileFuture<'a>;
}

/// Dart Sass (or any CLI-compatible compiler) reading from stdin.
#[derive(Debug, Clone)]
pub struct SassCommandCompiler {
    program: String,
    leading_args: Vec<String>,
}

impl SassCommandCompiler {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, leading_args) = command.split_first().ok_or_else(|| {
            LabrunError::ConfigError("style compiler command must not be empty".to_string())
        })?;
        Ok(Self {
            program: program.clone(),
            leading_args: leading_args.to_vec(),
        })
    }

    pub fn args(&self, load_path: &Path) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend([
            "--stdin".to_string(),
            "--load-path".to_string(),
            load_path.to_string_lossy().into_owned(),
            "--embed-source-map".to_string(),
            "--embed-sources".to_string(),
            "--no-unicode".to_string(),
        ]);
        args
    }
}

impl StyleCompiler for SassCommandCompiler {
    fn compile<'a>(&'a self, source: String, file: &'a Path, load_path: &'a Path) -> CompileFuture<'a> {
        Box::pin(async move {
            let output = run_command(&self.program, &self.args(load_path), Some(source.into_bytes()))
                .await
                .map_err(|e| StyleCompileError::other(file, -1, format!("{e:#}")))?;

            if output.success {
                Ok(output.stdout)
            } else {
                Err(parse_sass_error(file, output.code.unwrap_or(-1), &output.stderr))
            }
        })
    }
}

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s+(\S+)\s+(\d+):(\d+)\s+").expect("valid location regex")
});

/// Pull message, line and column out of Dart Sass stderr.
pub fn parse_sass_error(file: &Path, status: i32, stderr: &str) -> StyleCompileError {
    let message = stderr
        .lines()
        .find_map(|line| line.strip_prefix("Error: "))
        .map(str::to_string)
        .unwrap_or_else(|| stderr.trim().to_string());

    let mut error = StyleCompileError::other(file, status, message);

    if let Some(caps) = LOCATION_RE.captures(stderr) {
        let source = &caps[1];
        // "-" is stdin, i.e. the entry itself.
        if source != "-" {
            error.file = source.to_string();
        }
        error.line = caps[2].parse().ok();
        error.column = caps[3].parse().ok();
    }

    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stdin_location() {
        let stderr = "Error: Undefined variable.\n  ,\n3 |   color: $missing;\n  |          ^^^^^^^^\n  '\n  - 3:10  root stylesheet\n";
        let err = parse_sass_error(Path::new("source/css/scss/style.scss"), 65, stderr);

        assert_eq!(err.file, "source/css/scss/style.scss");
        assert_eq!(err.line, Some(3));
        assert_eq!(err.column, Some(10));
        assert_eq!(err.status, 65);
        assert_eq!(err.message, "Undefined variable.");
    }

    #[test]
    fn partial_location_overrides_file() {
        let stderr = "Error: expected \";\".\n  scss/_card.scss 7:3  @import\n  - 2:9  root stylesheet\n";
        let err = parse_sass_error(Path::new("style.scss"), 65, stderr);
        assert_eq!(err.file, "scss/_card.scss");
        assert_eq!(err.line, Some(7));
    }

    #[test]
    fn sass_args_read_stdin() {
        let compiler = SassCommandCompiler::new(&["sass".to_string()]).unwrap();
        let args = compiler.args(Path::new("source/css/scss"));
        assert_eq!(args[0], "--stdin");
        assert!(args.contains(&"--embed-source-map".to_string()));
    }
}
