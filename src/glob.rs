// src/glob.rs

//! Glob matching over `/`-separated relative paths.
//!
//! Patterns follow the usual shell-glob conventions used by front-end
//! tooling: `*` and `?` never cross a `/`, `**` spans directories, and
//! dotfiles are not matched by wildcards (they are skipped while walking).

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::fs::FileSystem;

const META_CHARS: &[char] = &['*', '?', '[', '{'];

/// Compiled include / exclude sets.
#[derive(Clone)]
pub struct GlobFilter {
    include: GlobSet,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for GlobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobFilter")
            .field("include", &self.include.len())
            .field("exclude", &self.exclude.as_ref().map(GlobSet::len))
            .finish()
    }
}

impl GlobFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self> {
        let include = build_globset(include).context("building include globset")?;
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };
        Ok(Self { include, exclude })
    }

    /// Single include pattern, no excludes.
    pub fn single(pattern: &str) -> Result<Self> {
        Self::new(&[pattern], &[])
    }

    /// True if `rel_path` (relative, `/`-separated) is included and not excluded.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let pat = pat.as_ref();
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Walk `root` recursively and return every file whose path relative to
/// `root` passes `filter`. Entries whose name starts with `.` are skipped,
/// and symlinked directories are not descended into (a link back up the
/// tree would otherwise be walked until the OS gives up). Symlinked files
/// still match. The result is sorted.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &GlobFilter,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if hidden {
                continue;
            }

            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    debug!(path = %path.display(), "not following symlinked directory");
                    continue;
                }
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Some(rel) = rel_str(root, &path) {
                    if filter.matches(&rel) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// `path` relative to `root`, `/`-separated.
pub fn rel_str(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

/// True if `pattern` contains no glob metacharacters.
pub fn is_literal(pattern: &str) -> bool {
    !pattern.contains(META_CHARS)
}

/// Split `pattern` into its literal directory prefix and the remainder.
///
/// `source/css/scss/**/*.scss` → (`source/css/scss`, `**/*.scss`);
/// `source/favicon.ico` → (`source`, `favicon.ico`). The base is empty when
/// the first segment is already a glob.
pub fn split_pattern(pattern: &str) -> (String, String) {
    let segments: Vec<&str> = pattern.split('/').collect();

    let literal_prefix = segments
        .iter()
        .take_while(|segment| is_literal(segment))
        .count();
    // Literal patterns keep their last segment (the file name) on the right.
    let split_at = literal_prefix.min(segments.len().saturating_sub(1));

    (segments[..split_at].join("/"), segments[split_at..].join("/"))
}

/// Directory prefix of `pattern` that contains no glob metacharacters,
/// or `"."` when there is none.
pub fn glob_base(pattern: &str) -> String {
    let (base, _) = split_pattern(pattern);
    if base.is_empty() { ".".to_string() } else { base }
}
