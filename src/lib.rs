// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod generator;
pub mod glob;
pub mod graph;
pub mod logging;
pub mod paths;
pub mod server;
pub mod sprite;
pub mod styles;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::graph::{ActionSet, Runner, TaskGraph, standard_graph};
use crate::tasks::{TaskArgs, TaskContext};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task context (filesystem, generator, style compiler, reload hub)
/// - the standard task graph
/// - running the requested task
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(PathBuf::from(&args.config))?;
    let graph = standard_graph(ActionSet::builtin())?;

    if args.list {
        print_task_list(&graph);
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&graph, &args.task)?;
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let ctx = TaskContext::new(cfg, cwd)?.with_args(TaskArgs {
        kit: args.kit.clone(),
        clean: args.clean,
        plugin: args.plugin.clone(),
    });

    let runner = Runner::new(graph, ctx);
    runner.run(&args.task).await?;
    Ok(())
}

fn print_task_list(graph: &TaskGraph) {
    println!("tasks:");
    for name in graph.names() {
        let composition = graph.composition(name).unwrap_or_default();
        match graph.get(name).and_then(|d| d.description.as_deref()) {
            Some(description) => println!("  {name:<28} {composition}  # {description}"),
            None => println!("  {name:<28} {composition}"),
        }
    }
}

/// Print the flattened action order of `task` without running anything.
fn print_dry_run(graph: &TaskGraph, task: &str) -> Result<()> {
    let plan = graph.plan(task)?;

    println!("labrun dry-run: {task}");
    for (index, step) in plan.iter().enumerate() {
        println!("  {:>2}. {step}", index + 1);
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
