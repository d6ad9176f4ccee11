// src/graph/runner.rs

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::errors::{LabrunError, Result};
use crate::graph::{TaskFuture, TaskGraph, TaskNode};
use crate::tasks::TaskContext;
use crate::types::TaskName;

/// Executes tasks of a [`TaskGraph`] against a shared [`TaskContext`].
///
/// Cloning is cheap; parallel groups hand clones to their spawned children.
#[derive(Debug, Clone)]
pub struct Runner {
    graph: Arc<TaskGraph>,
    ctx: Arc<TaskContext>,
}

impl Runner {
    pub fn new(graph: TaskGraph, ctx: TaskContext) -> Self {
        Self {
            graph: Arc::new(graph),
            ctx: Arc::new(ctx),
        }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn context(&self) -> &TaskContext {
        &self.ctx
    }

    /// Run `name` (action or composite) to completion.
    pub fn run<'a>(&'a self, name: &'a str) -> TaskFuture<'a> {
        Box::pin(async move {
            let declared = self
                .graph
                .get(name)
                .ok_or_else(|| LabrunError::TaskNotFound(name.to_string()))?;

            let started = Instant::now();
            info!(task = %name, "starting");

            let result = match &declared.node {
                TaskNode::Action(task) => task.run(self).await,
                TaskNode::Series(children) => self.run_series(children).await,
                TaskNode::Parallel(children) => self.run_parallel(children).await,
            };

            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => info!(task = %name, elapsed_ms, "finished"),
                Err(err) => error!(task = %name, elapsed_ms, error = %err, "failed"),
            }
            result
        })
    }

    /// Run `names` strictly one after another; the first error aborts the rest.
    pub async fn run_series(&self, names: &[TaskName]) -> Result<()> {
        for name in names {
            self.run(name).await?;
        }
        Ok(())
    }

    /// Run `names` concurrently, wait for all of them and return the first
    /// error (in completion order).
    pub async fn run_parallel(&self, names: &[TaskName]) -> Result<()> {
        let mut set = JoinSet::new();
        for name in names {
            let runner = self.clone();
            let name = name.clone();
            set.spawn(async move { runner.run(&name).await });
        }

        let mut first_err = None;
        while let Some(joined) = set.join_next().await {
            let result = joined
                .map_err(|e| LabrunError::Other(anyhow::Error::new(e)))
                .and_then(|r| r);
            if let Err(err) = result {
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
