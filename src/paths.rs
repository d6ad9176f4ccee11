// src/paths.rs

//! Path normalisation shared by the copy tasks, the style pipeline and the
//! watcher.
//!
//! Every configured directory fragment goes through [`normalize_path_from`]
//! so that globs and watch patterns are all expressed the same way: relative
//! to the working directory, with forward slashes and without a leading
//! `./`. Backslashes inside fragments are treated as separators, which makes
//! the output independent of the host's separator convention.

use std::path::{Component, Path, PathBuf};

/// Normalise `fragments` against the current process working directory.
///
/// If the working directory cannot be determined, `/` is used as the base;
/// fragments are then expressed relative to the filesystem root.
pub fn normalize_path<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    normalize_path_from(&cwd, fragments)
}

/// Resolve `fragments` left to right starting at `cwd`, then express the
/// result relative to `cwd` using `/` as the only separator.
///
/// - later fragments resolve relative to earlier ones;
/// - absolute fragments reset the base;
/// - `.` and `..` are folded lexically (no filesystem access);
/// - the identity result is `"."`.
pub fn normalize_path_from<I, S>(cwd: &Path, fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let target = resolve(cwd, fragments);
    relative_path(cwd, &target)
}

/// Absolute, lexically normalised location of `fragments` resolved from `cwd`.
pub fn resolve<I, S>(cwd: &Path, fragments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut resolved = lexical(cwd);

    for fragment in fragments {
        let fragment = fragment.as_ref().replace('\\', "/");
        if fragment.is_empty() {
            continue;
        }
        // `join` replaces the base when the fragment is absolute / rooted.
        resolved = lexical(&resolved.join(&fragment));
    }

    resolved
}

/// Relative path from `base` to `target`, `/`-separated.
///
/// When the two share no root (e.g. different drives) the target itself is
/// returned, with forward slashes.
pub fn relative_path(base: &Path, target: &Path) -> String {
    let base = lexical(base);
    let target = lexical(target);

    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 && base.has_root() && target.has_root() {
        return target.to_string_lossy().replace('\\', "/");
    }

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..".to_string());
    }
    for component in &target_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/").replace('\\', "/")
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                None | Some(Component::ParentDir) => out.push(".."),
                // Cannot climb above the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(_) => {
                    out.pop();
                }
            },
            Component::Normal(part) => out.push(part),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd() -> PathBuf {
        PathBuf::from("/work/site")
    }

    #[test]
    fn strips_leading_dot_slash() {
        assert_eq!(normalize_path_from(&cwd(), ["./source/js"]), "source/js");
    }

    #[test]
    fn later_fragments_resolve_against_earlier_ones() {
        assert_eq!(
            normalize_path_from(&cwd(), ["./source/css/", "scss/**/*.scss"]),
            "source/css/scss/**/*.scss"
        );
    }

    #[test]
    fn absolute_fragment_resets_base() {
        assert_eq!(
            normalize_path_from(&cwd(), ["source", "/work/site/public/css"]),
            "public/css"
        );
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        assert_eq!(
            normalize_path_from(&cwd(), [r".\source\images", "sprite"]),
            "source/images/sprite"
        );
    }

    #[test]
    fn parent_directories_are_kept_when_leaving_cwd() {
        assert_eq!(
            normalize_path_from(&cwd(), ["../shared/fonts"]),
            "../shared/fonts"
        );
        assert_eq!(
            normalize_path_from(&cwd(), ["source/css", "../images/sprite.svg"]),
            "source/images/sprite.svg"
        );
    }

    #[test]
    fn identity_is_dot() {
        assert_eq!(normalize_path_from(&cwd(), ["."]), ".");
        assert_eq!(normalize_path_from(&cwd(), Vec::<String>::new()), ".");
    }

    #[test]
    fn relative_path_handles_siblings() {
        assert_eq!(
            relative_path(Path::new("/a/b/c"), Path::new("/a/d/e.css")),
            "../../d/e.css"
        );
    }
}
