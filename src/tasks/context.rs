// src/tasks/context.rs

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::watch;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::generator::{CommandGenerator, GeneratorAdapter, PatternGenerator};
use crate::paths;
use crate::server::ReloadHub;
use crate::styles::{SassCommandCompiler, StyleCompiler};

/// Flags forwarded from the command line to individual tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskArgs {
    pub kit: Option<String>,
    pub clean: bool,
    pub plugin: Option<String>,
}

/// Everything a task may touch, passed explicitly instead of living in
/// globals. Immutable apart from the server address (set once) and the
/// shutdown signal.
#[derive(Debug)]
pub struct TaskContext {
    config: Arc<ConfigFile>,
    cwd: PathBuf,
    fs: Arc<dyn FileSystem>,
    generator: GeneratorAdapter,
    style_compiler: Arc<dyn StyleCompiler>,
    hub: ReloadHub,
    args: TaskArgs,
    build_stamp: u64,
    server_addr: OnceLock<SocketAddr>,
    shutdown: watch::Sender<bool>,
}

impl TaskContext {
    /// Production wiring: real filesystem, command-line generator and Sass.
    pub fn new(config: ConfigFile, cwd: impl Into<PathBuf>) -> Result<Self> {
        let generator = CommandGenerator::from_config(&config)?;
        let compiler = SassCommandCompiler::new(&config.runner().styles.compiler)?;

        Ok(Self::with_parts(
            config,
            cwd,
            Arc::new(RealFileSystem),
            Arc::new(generator),
            Arc::new(compiler),
        ))
    }

    pub fn with_parts(
        config: ConfigFile,
        cwd: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        generator: Arc<dyn PatternGenerator>,
        style_compiler: Arc<dyn StyleCompiler>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config: Arc::new(config),
            cwd: cwd.into(),
            fs,
            generator: GeneratorAdapter::new(generator),
            style_compiler,
            hub: ReloadHub::new(),
            args: TaskArgs::default(),
            build_stamp: now_ms(),
            server_addr: OnceLock::new(),
            shutdown,
        }
    }

    pub fn with_args(mut self, args: TaskArgs) -> Self {
        self.args = args;
        self
    }

    pub fn with_build_stamp(mut self, stamp: u64) -> Self {
        self.build_stamp = stamp;
        self
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn fs_arc(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    pub fn generator(&self) -> &GeneratorAdapter {
        &self.generator
    }

    pub fn style_compiler(&self) -> Arc<dyn StyleCompiler> {
        Arc::clone(&self.style_compiler)
    }

    pub fn reload_hub(&self) -> &ReloadHub {
        &self.hub
    }

    pub fn args(&self) -> &TaskArgs {
        &self.args
    }

    /// Milliseconds since the epoch, taken once at startup.
    pub fn build_stamp(&self) -> u64 {
        self.build_stamp
    }

    /// Absolute location of configured path fragments.
    pub fn resolve<I, S>(&self, fragments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths::resolve(&self.cwd, fragments)
    }

    /// Same fragments, as a `/`-separated path relative to the working directory.
    pub fn normalize<I, S>(&self, fragments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths::normalize_path_from(&self.cwd, fragments)
    }

    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server_addr.get().copied()
    }

    pub(crate) fn set_server_addr(&self, addr: SocketAddr) {
        let _ = self.server_addr.set(addr);
    }

    /// Ask long-running tasks (the watcher) to stop.
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
