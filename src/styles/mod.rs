// src/styles/mod.rs

//! Style pipeline: glob-import expansion, Sass compilation, vendor
//! prefixing and source-map re-attachment for one entry file.

use std::path::Path;
use std::sync::Arc;

use lightningcss::targets::Browsers;
use tracing::debug;

use crate::fs::FileSystem;

pub mod compiler;
pub mod glob_import;
pub mod prefix;

pub use compiler::{SassCommandCompiler, StyleCompileError, StyleCompiler};

const SOURCE_MAP_MARKER: &str = "/*# sourceMappingURL=";

#[derive(Debug, Clone)]
pub struct StylePipeline {
    fs: Arc<dyn FileSystem>,
    compiler: Arc<dyn StyleCompiler>,
    browsers: Option<Browsers>,
}

impl StylePipeline {
    pub fn new(fs: Arc<dyn FileSystem>, compiler: Arc<dyn StyleCompiler>, browsers: Option<Browsers>) -> Self {
        Self {
            fs,
            compiler,
            browsers,
        }
    }

    /// Produce the final CSS for `entry`.
    pub async fn compile_entry(&self, entry: &Path) -> Result<String, StyleCompileError> {
        let entry_dir = entry.parent().unwrap_or(Path::new("."));

        let source = self
            .fs
            .read_to_string(entry)
            .map_err(|e| StyleCompileError::other(entry, -1, format!("{e:#}")))?;

        let expanded = glob_import::expand_glob_imports(self.fs.as_ref(), entry_dir, &source)
            .map_err(|e| StyleCompileError::other(entry, -1, format!("{e:#}")))?;

        let compiled = self.compiler.compile(expanded, entry, entry_dir).await?;
        let (body, source_map) = split_source_map(&compiled);
        let input_map = source_map.and_then(source_map_url);

        let filename = entry.to_string_lossy();
        let prefixed = prefix::prefix_css(body, &filename, self.browsers, input_map)
            .map_err(|message| StyleCompileError::other(entry, 1, message))?;

        let comment = prefixed
            .source_map
            .map(|url| format!("{SOURCE_MAP_MARKER}{url} */"));

        debug!(entry = %filename, has_source_map = comment.is_some(), "entry compiled");
        Ok(attach_source_map(&prefixed.code, comment.as_deref()))
    }
}

/// Split a trailing `sourceMappingURL` comment off `css`.
pub fn split_source_map(css: &str) -> (&str, Option<&str>) {
    match css.rfind(SOURCE_MAP_MARKER) {
        Some(idx) => (&css[..idx], Some(css[idx..].trim_end())),
        None => (css, None),
    }
}

/// URL inside a `/*# sourceMappingURL=... */` comment.
pub fn source_map_url(comment: &str) -> Option<&str> {
    comment
        .strip_prefix(SOURCE_MAP_MARKER)?
        .trim_end()
        .strip_suffix("*/")
        .map(str::trim)
}

pub fn attach_source_map(css: &str, source_map: Option<&str>) -> String {
    let body = css.trim_end();
    match source_map {
        Some(comment) => format!("{body}\n\n{comment}\n"),
        None => format!("{body}\n"),
    }
}
