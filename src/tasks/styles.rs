// src/tasks/styles.rs

use std::path::PathBuf;

use tracing::{error, info};

use crate::errors::{LabrunError, Result};
use crate::glob::{GlobFilter, collect_matching_files, rel_str, split_pattern};
use crate::styles::StylePipeline;
use crate::styles::prefix::browsers_from_queries;
use crate::tasks::TaskContext;

/// `sass-compile`: compile every non-partial entry into `paths.source.css`.
///
/// Per-entry failures are reported and skipped; only a missing stylesheet
/// directory fails the task. Returns the written files.
pub async fn run_sass_compile(ctx: &TaskContext) -> Result<Vec<PathBuf>> {
    let cfg = ctx.config();
    let styles = &cfg.runner().styles;

    let css_dir = ctx.resolve([&cfg.source().css]);
    if !ctx.fs().is_dir(&css_dir) {
        return Err(LabrunError::SourceNotFound(format!(
            "stylesheet directory {} does not exist",
            css_dir.display()
        )));
    }

    let (base, rest) = split_pattern(&styles.entries);
    let entries_root = if base.is_empty() {
        css_dir.clone()
    } else {
        css_dir.join(base)
    };

    let entries = {
        let fs = ctx.fs_arc();
        let root = entries_root.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
            if !fs.is_dir(&root) {
                return Ok(Vec::new());
            }
            let filter = GlobFilter::single(&rest)?;
            let files = collect_matching_files(fs.as_ref(), &root, &filter)?;
            Ok(files
                .into_iter()
                .filter(|f| {
                    !f.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with('_'))
                })
                .collect())
        })
        .await
        .map_err(anyhow::Error::new)??
    };

    let browsers = browsers_from_queries(&styles.browsers)?;
    let pipeline = StylePipeline::new(ctx.fs_arc(), ctx.style_compiler(), browsers);

    let mut written = Vec::new();
    let mut failed = 0usize;

    for entry in &entries {
        match pipeline.compile_entry(entry).await {
            Ok(css) => {
                let Some(rel) = rel_str(&entries_root, entry) else {
                    continue;
                };
                let target = css_dir.join(rel).with_extension("css");
                ctx.fs().write(&target, css.as_bytes())?;
                written.push(target);
            }
            Err(err) => {
                failed += 1;
                error!(
                    file = %err.file,
                    line = ?err.line,
                    column = ?err.column,
                    status = err.status,
                    message = %err.message,
                    "style compile error"
                );
            }
        }
    }

    info!(
        entries = entries.len(),
        written = written.len(),
        failed,
        "styles compiled"
    );

    ctx.reload_hub().stream(&written);
    Ok(written)
}
