// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    symlinks: BTreeSet<PathBuf>,
}

impl MockState {
    fn ensure_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

/// In-memory filesystem. Directories exist implicitly once a file below
/// them is added, or explicitly via [`MockFileSystem::add_dir`].
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        state.ensure_parents(&path);
        state.files.insert(path, content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        state.ensure_parents(&path);
        state.dirs.insert(path);
    }

    /// A directory reached through a symbolic link.
    pub fn add_symlinked_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        state.ensure_parents(&path);
        state.dirs.insert(path.clone());
        state.symlinks.insert(path);
    }

    fn bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let state = self.lock();
        match state.files.get(path) {
            Some(content) => Ok(content.clone()),
            None if state.dirs.contains(path) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    /// Every file path currently stored, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.bytes(path)?;
        String::from_utf8(bytes).map_err(|e| anyhow!("Invalid UTF-8 in {:?}: {}", path, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let content = self.bytes(from)?;
        self.add_file(to, content);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.lock().symlinks.contains(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        if !state.dirs.contains(path) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }

        let children = state
            .dirs
            .iter()
            .chain(state.files.keys())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children)
    }
}
