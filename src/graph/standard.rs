// src/graph/standard.rs

//! The fixed task graph of a Pattern Lab project.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{LabrunError, Result};
use crate::graph::{Task, TaskGraph, TaskGraphBuilder, task_fn};
use crate::tasks::{self, AssetClass};

/// Leaf actions with their `--list` descriptions, in declaration order.
const ACTIONS: &[(&str, &str)] = &[
    ("sass-compile", "Compile Sass entries into the source stylesheet directory"),
    ("sprite", "Pack sprite icons into an SVG sheet and SCSS partial"),
    ("pl-copy:js", "Copy scripts to public"),
    ("pl-copy:img", "Copy images to public"),
    ("pl-copy:favicon", "Copy the favicon to public"),
    ("pl-copy:font", "Copy fonts to public"),
    ("pl-copy:css", "Copy compiled stylesheets to public"),
    ("pl-copy:styleguide", "Copy styleguide assets (except CSS) to public"),
    ("pl-copy:styleguide-css", "Copy and flatten styleguide CSS"),
    ("generate", "Build the pattern library"),
    ("patternlab:version", "Print the generator version"),
    ("patternlab:help", "Print generator help"),
    ("patternlab:patternsonly", "Build patterns only"),
    ("patternlab:liststarterkits", "List available starter kits"),
    ("patternlab:loadstarterkit", "Load a starter kit (--kit, --clean)"),
    ("patternlab:installplugin", "Install a generator plugin (--plugin)"),
    ("patternlab:connect", "Start the live-reload server"),
    ("reload", "Reload connected browsers"),
    ("reload-css", "Re-inject stylesheets in connected browsers"),
    ("watch-files", "Watch sources and rebuild on change"),
];

/// The leaf actions the standard graph is assembled from.
///
/// [`ActionSet::builtin`] holds the production implementations; tests swap
/// individual entries with [`ActionSet::with`] without touching compositions.
pub struct ActionSet {
    actions: HashMap<String, Arc<dyn Task>>,
}

impl ActionSet {
    pub fn action_names() -> impl Iterator<Item = &'static str> {
        ACTIONS.iter().map(|(name, _)| *name)
    }

    pub fn builtin() -> Self {
        let mut actions: HashMap<String, Arc<dyn Task>> = HashMap::new();
        let mut add = |name: &str, task: Arc<dyn Task>| {
            actions.insert(name.to_string(), task);
        };

        add(
            "sass-compile",
            task_fn(|r| async move { tasks::styles::run_sass_compile(r.context()).await.map(|_| ()) }),
        );
        add("sprite", task_fn(|r| async move { tasks::sprite::run_sprite(r.context()).await }));

        for class in AssetClass::ALL {
            add(
                class.task_name(),
                task_fn(move |r| async move {
                    tasks::copy::run_copy(r.context(), class).await.map(|_| ())
                }),
            );
        }

        add("generate", task_fn(|r| async move { tasks::generator::generate(r.context()).await }));
        add(
            "patternlab:version",
            task_fn(|r| async move { tasks::generator::version(r.context()).await }),
        );
        add(
            "patternlab:help",
            task_fn(|r| async move { tasks::generator::help(r.context()).await }),
        );
        add(
            "patternlab:patternsonly",
            task_fn(|r| async move { tasks::generator::patterns_only(r.context()).await }),
        );
        add(
            "patternlab:liststarterkits",
            task_fn(|r| async move { tasks::generator::list_starterkits(r.context()).await }),
        );
        add(
            "patternlab:loadstarterkit",
            task_fn(|r| async move { tasks::generator::load_starterkit(r.context()).await }),
        );
        add(
            "patternlab:installplugin",
            task_fn(|r| async move { tasks::generator::install_plugin(r.context()).await }),
        );
        add(
            "patternlab:connect",
            task_fn(|r| async move { tasks::serve::connect(r.context()).await }),
        );
        add("reload", task_fn(|r| async move { tasks::serve::reload(r.context()).await }));
        add(
            "reload-css",
            task_fn(|r| async move { tasks::serve::reload_css(r.context()).await }),
        );
        add("watch-files", task_fn(|r| async move { tasks::watch::watch_files(&r).await }));

        Self { actions }
    }

    /// Replace (or add) the action registered under `name`.
    pub fn with(mut self, name: &str, task: Arc<dyn Task>) -> Self {
        self.actions.insert(name.to_string(), task);
        self
    }
}

pub fn standard_graph(mut actions: ActionSet) -> Result<TaskGraph> {
    let mut builder = TaskGraphBuilder::new();

    for (name, description) in ACTIONS {
        let task = actions
            .actions
            .remove(*name)
            .ok_or_else(|| LabrunError::TaskNotFound(name.to_string()))?;
        builder = builder.action(name, task).describe(name, description);
    }

    let copies: Vec<&str> = AssetClass::ALL.iter().map(|c| c.task_name()).collect();

    builder
        .series("pl-assets", &copies)
        .describe("pl-assets", "Copy every asset class to public")
        .series("patternlab:build", &["sass-compile", "pl-assets", "generate"])
        .describe("patternlab:build", "Compile styles, copy assets, build the library")
        .series("patternlab:watch", &["patternlab:build", "watch-files"])
        .describe("patternlab:watch", "Build, then watch")
        .series(
            "patternlab:serve",
            &["patternlab:build", "patternlab:connect", "watch-files"],
        )
        .describe("patternlab:serve", "Build, serve with live reload, then watch")
        .series("default", &["patternlab:build"])
        .series("serve", &["patternlab:serve"])
        .build()
}
