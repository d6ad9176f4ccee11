// src/sprite/mod.rs

//! SVG sprite sheet + SCSS partial generation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::glob::{GlobFilter, collect_matching_files, split_pattern};
use crate::paths::relative_path;

pub mod layout;
pub mod render;
pub mod svg;

pub use layout::{Rect, SpriteLayout, diagonal_layout};
pub use svg::{SvgIcon, parse_svg};

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("invalid SVG '{file}': {reason}")]
    InvalidSvg { file: String, reason: String },

    #[error("SVG '{file}' has no usable width/height or viewBox")]
    MissingDimensions { file: String },

    #[error("sprite IO error: {0:#}")]
    Io(#[from] anyhow::Error),
}

/// Fully resolved inputs of one sprite run.
#[derive(Debug, Clone)]
pub struct SpriteJob {
    pub images_dir: PathBuf,
    /// Icon glob relative to `images_dir`.
    pub source_glob: String,
    /// Directory the compiled stylesheets live in; the sprite URL is relative to it.
    pub css_dir: PathBuf,
    pub sprite_path: PathBuf,
    pub partial_path: PathBuf,
    pub padding: u32,
    pub class_prefix: String,
    pub now: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteOutput {
    pub icons: usize,
    pub width: f64,
    pub height: f64,
}

pub fn build_sprite(fs: &dyn FileSystem, job: &SpriteJob) -> Result<SpriteOutput, SpriteError> {
    let icons = load_icons(fs, &job.images_dir, &job.source_glob)?;
    if icons.is_empty() {
        info!(glob = %job.source_glob, "no sprite icons found");
        return Ok(SpriteOutput {
            icons: 0,
            width: 0.0,
            height: 0.0,
        });
    }

    let sizes: Vec<(f64, f64)> = icons.iter().map(|i| (i.width, i.height)).collect();
    let layout = diagonal_layout(&sizes, f64::from(job.padding));

    let sprite_url = relative_path(&job.css_dir, &job.sprite_path);
    let scss = render::render_scss(
        &icons,
        &layout,
        &render::PartialOptions {
            sprite_url: &sprite_url,
            class_prefix: &job.class_prefix,
            now: job.now,
        },
    );

    fs.write(&job.sprite_path, render::render_sprite(&icons, &layout).as_bytes())?;
    fs.write(&job.partial_path, scss.as_bytes())?;

    debug!(
        sprite = %job.sprite_path.display(),
        partial = %job.partial_path.display(),
        "sprite written"
    );

    Ok(SpriteOutput {
        icons: icons.len(),
        width: layout.width,
        height: layout.height,
    })
}

/// Parse every icon matching `glob` under `images_dir`, sorted by file name.
fn load_icons(fs: &dyn FileSystem, images_dir: &Path, glob: &str) -> Result<Vec<SvgIcon>, SpriteError> {
    let (base, rest) = split_pattern(glob);
    let root = if base.is_empty() {
        images_dir.to_path_buf()
    } else {
        images_dir.join(base)
    };
    if !fs.is_dir(&root) {
        return Ok(Vec::new());
    }

    let filter = GlobFilter::single(&rest)?;
    let mut files = collect_matching_files(fs, &root, &filter)?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    files
        .iter()
        .map(|file| {
            let name = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = fs.read_to_string(file)?;
            parse_svg(&name, &content)
        })
        .collect()
}
