// src/tasks/copy.rs

//! The seven asset copy tasks run by `pl-assets`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::errors::{LabrunError, Result};
use crate::fs::FileSystem;
use crate::glob::{GlobFilter, collect_matching_files, is_literal, rel_str};
use crate::tasks::TaskContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Js,
    Images,
    Favicon,
    Fonts,
    Css,
    Styleguide,
    StyleguideCss,
}

/// What to copy for one asset class, with config paths already filled in.
#[derive(Debug, Clone)]
pub struct CopySpec {
    pub source: String,
    pub include: &'static str,
    pub exclude: Option<&'static str>,
    pub destination: Vec<String>,
    /// Keep only the file name, dropping source subdirectories.
    pub flatten: bool,
    /// Push written files to connected live-reload clients.
    pub notify: bool,
}

impl AssetClass {
    /// Declaration order; `pl-assets` runs them in this order.
    pub const ALL: [AssetClass; 7] = [
        AssetClass::Js,
        AssetClass::Images,
        AssetClass::Favicon,
        AssetClass::Fonts,
        AssetClass::Css,
        AssetClass::Styleguide,
        AssetClass::StyleguideCss,
    ];

    pub fn task_name(self) -> &'static str {
        match self {
            AssetClass::Js => "pl-copy:js",
            AssetClass::Images => "pl-copy:img",
            AssetClass::Favicon => "pl-copy:favicon",
            AssetClass::Fonts => "pl-copy:font",
            AssetClass::Css => "pl-copy:css",
            AssetClass::Styleguide => "pl-copy:styleguide",
            AssetClass::StyleguideCss => "pl-copy:styleguide-css",
        }
    }

    pub fn spec(self, cfg: &ConfigFile) -> CopySpec {
        let src = cfg.source();
        let public = cfg.public();

        let (source, include, exclude, destination, flatten, notify) = match self {
            AssetClass::Js => (&src.js, "**/*.js", None, vec![public.js.clone()], false, false),
            AssetClass::Images => (&src.images, "**/*.*", None, vec![public.images.clone()], false, false),
            AssetClass::Favicon => (&src.root, "favicon.ico", None, vec![public.root.clone()], false, false),
            AssetClass::Fonts => (&src.fonts, "*", None, vec![public.fonts.clone()], false, false),
            AssetClass::Css => (&src.css, "*.css", None, vec![public.css.clone()], false, true),
            AssetClass::Styleguide => (
                &src.styleguide,
                "**/*",
                Some("**/*.css"),
                vec![public.root.clone()],
                false,
                true,
            ),
            AssetClass::StyleguideCss => (
                &src.styleguide,
                "**/*.css",
                None,
                vec![public.styleguide.clone(), "css".to_string()],
                true,
                true,
            ),
        };

        CopySpec {
            source: source.clone(),
            include,
            exclude,
            destination,
            flatten,
            notify,
        }
    }
}

/// Run one copy task and return the written destination paths.
pub async fn run_copy(ctx: &TaskContext, class: AssetClass) -> Result<Vec<PathBuf>> {
    let spec = class.spec(ctx.config());
    let source = ctx.resolve([&spec.source]);
    let destination = ctx.resolve(&spec.destination);
    let notify = spec.notify;

    let fs = ctx.fs_arc();
    let written = tokio::task::spawn_blocking(move || {
        copy_matching(fs.as_ref(), &source, &destination, &spec)
    })
    .await
    .map_err(anyhow::Error::new)??;

    info!(task = class.task_name(), files = written.len(), "copied");

    if notify {
        ctx.reload_hub().stream(&written);
    }
    Ok(written)
}

/// Copy every file below `source` selected by `spec` into `destination`.
pub fn copy_matching(
    fs: &dyn FileSystem,
    source: &Path,
    destination: &Path,
    spec: &CopySpec,
) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(source) {
        return Err(LabrunError::SourceNotFound(format!(
            "source directory {} does not exist",
            source.display()
        )));
    }

    let excludes: Vec<&str> = spec.exclude.into_iter().collect();
    let filter = GlobFilter::new(&[spec.include], &excludes)?;
    let files = collect_matching_files(fs, source, &filter)?;

    if files.is_empty() && is_literal(spec.include) {
        return Err(LabrunError::SourceNotFound(format!(
            "file not found: {}",
            source.join(spec.include).display()
        )));
    }

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = if spec.flatten {
            match file.file_name() {
                Some(name) => destination.join(name),
                None => continue,
            }
        } else {
            match rel_str(source, &file) {
                Some(rel) => destination.join(rel),
                None => continue,
            }
        };

        debug!(from = %file.display(), to = %target.display(), "copy");
        fs.copy(&file, &target)?;
        written.push(target);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_names_follow_declaration_order() {
        let names: Vec<&str> = AssetClass::ALL.iter().map(|c| c.task_name()).collect();
        assert_eq!(
            names,
            vec![
                "pl-copy:js",
                "pl-copy:img",
                "pl-copy:favicon",
                "pl-copy:font",
                "pl-copy:css",
                "pl-copy:styleguide",
                "pl-copy:styleguide-css",
            ]
        );
    }
}
