// src/watch/subscriptions.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ConfigFile;
use crate::glob::{GlobFilter, glob_base};
use crate::paths::normalize_path_from;
use crate::types::TaskName;

/// A set of watched globs and the task series run when one of them changes.
#[derive(Clone)]
pub struct Subscription {
    name: String,
    patterns: Vec<String>,
    filter: GlobFilter,
    reaction: Vec<TaskName>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("patterns", &self.patterns)
            .field("reaction", &self.reaction)
            .finish()
    }
}

impl Subscription {
    /// `patterns` must already be normalised relative to the working directory.
    pub fn new(name: &str, patterns: Vec<String>, reaction: &[&str]) -> Result<Self> {
        let filter = GlobFilter::new(&patterns, &[])
            .with_context(|| format!("building globs for subscription {name}"))?;
        Ok(Self {
            name: name.to_string(),
            patterns,
            filter,
            reaction: reaction.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn reaction(&self) -> &[TaskName] {
        &self.reaction
    }

    /// `rel_path` is relative to the working directory, `/`-separated.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.filter.matches(rel_path)
    }
}

/// The fixed set of watch subscriptions, in declaration order.
pub fn build_subscriptions(cfg: &ConfigFile, cwd: &Path) -> Result<Vec<Subscription>> {
    let src = cfg.source();
    let norm = |dir: &str, glob: &str| normalize_path_from(cwd, [dir, glob]);

    let mut pattern_globs = vec![
        norm(&src.patterns, "**/*.json"),
        norm(&src.patterns, "**/*.md"),
        norm(&src.data, "*.json"),
        norm(&src.fonts, "*"),
        norm(&src.images, "*"),
        norm(&src.meta, "*"),
        norm(&src.annotations, "*"),
    ];
    pattern_globs.extend(
        cfg.runner()
            .watch
            .template_extensions
            .iter()
            .map(|ext| norm(&src.patterns, &format!("**/*{ext}"))),
    );

    Ok(vec![
        Subscription::new("scripts", vec![norm(&src.js, "src/**/*.js")], &["pl-copy:js"])?,
        Subscription::new(
            "styles-source",
            vec![norm(&src.css, "scss/**/*.scss")],
            &["sass-compile"],
        )?,
        Subscription::new(
            "styles-compiled",
            vec![norm(&src.css, "**/*.css")],
            &["pl-copy:css", "reload-css"],
        )?,
        Subscription::new(
            "styleguide",
            vec![norm(&src.styleguide, "**/*.*")],
            &["pl-copy:styleguide", "pl-copy:styleguide-css", "reload-css"],
        )?,
        Subscription::new("patterns", pattern_globs, &["generate", "reload"])?,
    ])
}

/// Directories to hand to the OS watcher: the literal base of every glob,
/// deduplicated, nested duplicates dropped, existing ones only.
pub fn watch_roots(subscriptions: &[Subscription], cwd: &Path) -> Vec<PathBuf> {
    let bases: BTreeSet<PathBuf> = subscriptions
        .iter()
        .flat_map(|s| s.patterns())
        .map(|p| crate::paths::resolve(cwd, [glob_base(p)]))
        .collect();

    let mut roots: Vec<PathBuf> = Vec::new();
    for base in bases {
        if roots.iter().any(|r| base.starts_with(r)) {
            continue;
        }
        if base.is_dir() {
            roots.push(base);
        }
    }
    roots
}
