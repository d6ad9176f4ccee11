// src/fs/mod.rs

//! Filesystem seam for the asset tasks.
//!
//! Copying, style compilation and sprite generation only touch the disk
//! through [`FileSystem`], so their logic runs against [`mock::MockFileSystem`]
//! in tests. Writes always create missing parent directories; the public tree
//! is rebuilt from nothing on a clean checkout.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// True for the link itself, whatever it points at.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Direct children of `path`, as full paths, in no particular order.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// The real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display())),
        _ => Ok(()),
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        ensure_parent(path)?;
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        ensure_parent(to)?;
        fs::copy(from, to)
            .map(|_| ())
            .with_context(|| format!("copying {} to {}", from.display(), to.display()))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .and_then(|entries| entries.map(|entry| entry.map(|e| e.path())).collect())
            .with_context(|| format!("listing {}", path.display()))
    }
}
