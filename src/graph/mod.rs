// src/graph/mod.rs

//! Named task graph: actions composed into strict series and parallel
//! groups, validated once and immutable afterwards.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{LabrunError, Result};
use crate::types::TaskName;

pub mod runner;
pub mod standard;

pub use runner::Runner;
pub use standard::{ActionSet, standard_graph};

pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A leaf action. Receives the runner so it can reach the shared context or
/// run other tasks (the watcher does).
pub trait Task: Send + Sync {
    fn run<'a>(&'a self, runner: &'a Runner) -> TaskFuture<'a>;
}

/// Adapter turning an async closure into a [`Task`].
pub struct FnTask<F>(F);

impl<F, Fut> Task for FnTask<F>
where
    F: Fn(Runner) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn run<'a>(&'a self, runner: &'a Runner) -> TaskFuture<'a> {
        Box::pin((self.0)(runner.clone()))
    }
}

pub fn task_fn<F, Fut>(f: F) -> Arc<dyn Task>
where
    F: Fn(Runner) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnTask(f))
}

#[derive(Clone)]
pub enum TaskNode {
    Action(Arc<dyn Task>),
    Series(Vec<TaskName>),
    Parallel(Vec<TaskName>),
}

impl TaskNode {
    pub fn children(&self) -> &[TaskName] {
        match self {
            TaskNode::Action(_) => &[],
            TaskNode::Series(children) | TaskNode::Parallel(children) => children,
        }
    }
}

impl fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskNode::Action(_) => f.write_str("Action"),
            TaskNode::Series(c) => f.debug_tuple("Series").field(c).finish(),
            TaskNode::Parallel(c) => f.debug_tuple("Parallel").field(c).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declared {
    pub node: TaskNode,
    pub description: Option<String>,
}

#[derive(Default)]
pub struct TaskGraphBuilder {
    order: Vec<TaskName>,
    nodes: HashMap<TaskName, Declared>,
    duplicates: Vec<TaskName>,
}

impl TaskGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(mut self, name: &str, node: TaskNode) -> Self {
        let name = name.to_string();
        if self.nodes.contains_key(&name) {
            self.duplicates.push(name);
            return self;
        }
        self.order.push(name.clone());
        self.nodes.insert(
            name,
            Declared {
                node,
                description: None,
            },
        );
        self
    }

    pub fn action(self, name: &str, task: Arc<dyn Task>) -> Self {
        self.declare(name, TaskNode::Action(task))
    }

    pub fn series(self, name: &str, children: &[&str]) -> Self {
        self.declare(name, TaskNode::Series(to_names(children)))
    }

    pub fn parallel(self, name: &str, children: &[&str]) -> Self {
        self.declare(name, TaskNode::Parallel(to_names(children)))
    }

    /// Attach a description to an already declared task.
    pub fn describe(mut self, name: &str, description: &str) -> Self {
        if let Some(declared) = self.nodes.get_mut(name) {
            declared.description = Some(description.to_string());
        }
        self
    }

    pub fn build(self) -> Result<TaskGraph> {
        if let Some(name) = self.duplicates.first() {
            return Err(LabrunError::ConfigError(format!(
                "task '{name}' is declared more than once"
            )));
        }

        for name in &self.order {
            for child in self.nodes[name].node.children() {
                if child == name {
                    return Err(LabrunError::ConfigError(format!(
                        "task '{name}' cannot contain itself"
                    )));
                }
                if !self.nodes.contains_key(child) {
                    return Err(LabrunError::ConfigError(format!(
                        "task '{name}' references unknown task '{child}'"
                    )));
                }
            }
        }

        validate_acyclic(&self.order, &self.nodes)?;

        Ok(TaskGraph {
            order: self.order,
            nodes: self.nodes,
        })
    }
}

fn to_names(children: &[&str]) -> Vec<TaskName> {
    children.iter().map(|c| c.to_string()).collect()
}

fn validate_acyclic(order: &[TaskName], nodes: &HashMap<TaskName, Declared>) -> Result<()> {
    // Edge direction: composite -> child.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for name in order {
        graph.add_node(name.as_str());
        for child in nodes[name].node.children() {
            graph.add_edge(name.as_str(), child.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_) => Ok(()),
        Err(cycle) => Err(LabrunError::GraphCycle(format!(
            "cycle involving task '{}'",
            cycle.node_id()
        ))),
    }
}

/// Validated, immutable task graph.
pub struct TaskGraph {
    order: Vec<TaskName>,
    nodes: HashMap<TaskName, Declared>,
}

impl fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph").field("tasks", &self.order).finish()
    }
}

impl TaskGraph {
    pub fn get(&self, name: &str) -> Option<&Declared> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Task names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Leaf actions `name` expands to, in execution order (parallel groups
    /// are listed in declaration order).
    pub fn plan(&self, name: &str) -> Result<Vec<TaskName>> {
        let mut out = Vec::new();
        self.flatten_into(name, &mut out)?;
        Ok(out)
    }

    fn flatten_into(&self, name: &str, out: &mut Vec<TaskName>) -> Result<()> {
        let declared = self
            .get(name)
            .ok_or_else(|| LabrunError::TaskNotFound(name.to_string()))?;

        match &declared.node {
            TaskNode::Action(_) => out.push(name.to_string()),
            TaskNode::Series(children) | TaskNode::Parallel(children) => {
                for child in children {
                    self.flatten_into(child, out)?;
                }
            }
        }
        Ok(())
    }

    /// One-line summary used by `--list`.
    pub fn composition(&self, name: &str) -> Option<String> {
        let declared = self.get(name)?;
        Some(match &declared.node {
            TaskNode::Action(_) => "action".to_string(),
            TaskNode::Series(c) => format!("series({})", c.join(" -> ")),
            TaskNode::Parallel(c) => format!("parallel({})", c.join(", ")),
        })
    }
}
