// src/styles/glob_import.rs

//! Expansion of glob `@import` directives in Sass entry files.
//!
//! `@import "components/**/*.scss";` becomes one `@import` per matching
//! file, sorted, with paths relative to the entry file's directory.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::fs::FileSystem;
use crate::glob::{GlobFilter, collect_matching_files, is_literal, rel_str, split_pattern};

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^([ \t]*)@import\s+["']([^"']+)["']\s*;"#).expect("valid import regex")
});

/// Return `source` with every glob `@import` expanded against `entry_dir`.
/// Plain imports are left untouched; a glob matching nothing expands to
/// nothing.
pub fn expand_glob_imports(fs: &dyn FileSystem, entry_dir: &Path, source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for caps in IMPORT_RE.captures_iter(source) {
        let (Some(whole), Some(indent), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if is_literal(target.as_str()) {
            continue;
        }

        out.push_str(&source[last..whole.start()]);
        last = whole.end();

        let imports = resolve_glob(fs, entry_dir, target.as_str())?;
        let lines: Vec<String> = imports
            .iter()
            .map(|path| format!("{}@import \"{}\";", indent.as_str(), path))
            .collect();
        out.push_str(&lines.join("\n"));
    }

    out.push_str(&source[last..]);
    Ok(out)
}

fn resolve_glob(fs: &dyn FileSystem, entry_dir: &Path, pattern: &str) -> Result<Vec<String>> {
    let (base, rest) = split_pattern(pattern);
    let root = if base.is_empty() {
        entry_dir.to_path_buf()
    } else {
        entry_dir.join(&base)
    };

    if !fs.is_dir(&root) {
        return Ok(Vec::new());
    }

    let filter = GlobFilter::single(&rest)?;
    let files = collect_matching_files(fs, &root, &filter)?;

    Ok(files
        .iter()
        .filter_map(|file| rel_str(entry_dir, file))
        .collect())
}
