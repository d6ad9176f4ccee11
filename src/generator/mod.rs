// src/generator/mod.rs

//! Pattern-library generator adapter.
//!
//! The generator itself is an external collaborator. Its build entry points
//! either finish synchronously or hand back a deferred handle; the adapter
//! hides that difference so callers always observe completion only after the
//! underlying build has really finished.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;

pub mod command;

pub use command::CommandGenerator;

/// Boxed future returned by the asynchronous generator operations.
pub type GeneratorFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A build that is still running when the build call returns.
pub struct PendingBuild {
    fut: GeneratorFuture<'static, ()>,
}

impl PendingBuild {
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self { fut: Box::pin(fut) }
    }

    /// Resolve once the deferred build has finished.
    pub async fn wait(self) -> Result<()> {
        self.fut.await
    }
}

impl Debug for PendingBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PendingBuild")
    }
}

/// Tagged result of a build call.
#[derive(Debug)]
pub enum BuildCompletion {
    /// The build already finished inside the call.
    Completed,
    /// The build continues in the background.
    Pending(PendingBuild),
}

impl BuildCompletion {
    pub async fn finish(self) -> Result<()> {
        match self {
            BuildCompletion::Completed => Ok(()),
            BuildCompletion::Pending(pending) => {
                debug!("waiting for deferred generator build");
                pending.wait().await
            }
        }
    }
}

/// External contract of the pattern-library generator.
pub trait PatternGenerator: Send + Sync + Debug {
    fn build(&self, clean: bool) -> Result<BuildCompletion>;
    fn patterns_only(&self, clean: bool) -> Result<BuildCompletion>;
    fn version(&self) -> GeneratorFuture<'_, ()>;
    fn help(&self) -> GeneratorFuture<'_, ()>;
    fn list_starterkits(&self) -> GeneratorFuture<'_, ()>;
    fn load_starterkit<'a>(&'a self, kit: &'a str, clean: bool) -> GeneratorFuture<'a, ()>;
    fn install_plugin<'a>(&'a self, plugin: &'a str) -> GeneratorFuture<'a, ()>;
}

/// Uniform async surface over any [`PatternGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorAdapter {
    inner: Arc<dyn PatternGenerator>,
}

impl GeneratorAdapter {
    pub fn new(inner: Arc<dyn PatternGenerator>) -> Self {
        Self { inner }
    }

    /// Full build. Returns only after a deferred build has resolved.
    pub async fn build(&self, clean: bool) -> Result<()> {
        info!(clean, "generator build");
        self.inner.build(clean)?.finish().await
    }

    /// Patterns-only build, with the same completion guarantee as [`build`](Self::build).
    pub async fn patterns_only(&self, clean: bool) -> Result<()> {
        info!(clean, "generator patterns-only build");
        self.inner.patterns_only(clean)?.finish().await
    }

    pub async fn version(&self) -> Result<()> {
        self.inner.version().await
    }

    pub async fn help(&self) -> Result<()> {
        self.inner.help().await
    }

    pub async fn list_starterkits(&self) -> Result<()> {
        self.inner.list_starterkits().await
    }

    pub async fn load_starterkit(&self, kit: &str, clean: bool) -> Result<()> {
        info!(kit = %kit, clean, "loading starter kit");
        self.inner.load_starterkit(kit, clean).await
    }

    pub async fn install_plugin(&self, plugin: &str) -> Result<()> {
        info!(plugin = %plugin, "installing plugin");
        self.inner.install_plugin(plugin).await
    }
}
