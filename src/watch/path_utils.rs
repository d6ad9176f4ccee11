// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

use crate::paths::relative_path;

/// Express an event path relative to `cwd`, `/`-separated.
///
/// - First a lexical relative step from `cwd`.
/// - If `path` is not below `cwd` (e.g. symlinked temp dirs on macOS), both
///   are canonicalized and the step is retried.
///
/// Returns `None` only for relative paths outside `cwd`.
pub fn relative_str(cwd: &Path, path: &Path) -> Option<String> {
    if path.starts_with(cwd) {
        return Some(relative_path(cwd, path));
    }

    if let (Ok(cwd_canon), Ok(path_canon)) = (cwd.canonicalize(), path.canonicalize()) {
        if path_canon.starts_with(&cwd_canon) {
            return Some(relative_path(&cwd_canon, &path_canon));
        }
    }

    // Sources configured outside the working directory still match
    // `../`-prefixed globs.
    path.is_absolute().then(|| relative_path(cwd, path))
}
