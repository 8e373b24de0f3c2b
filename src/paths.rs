//! Path normalization for citation keys.
//!
//! Every file recorded in `file_citations` is keyed by its path relative to
//! the project root, `/`-separated, with `.` and `..` folded away. The same
//! file always produces the same key whether the caller spelled it
//! absolute or relative. Normalization is lexical: symlinks are not
//! resolved and the file does not need to exist.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root of an absolute path is dropped; leading `..` in a
/// relative path is kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Make `path` absolute against `base` (when relative) and clean it.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&base.join(path))
    }
}

/// Key under which `file_path` is stored for a project rooted at `root`.
///
/// `root` must already be absolute and clean. Relative `file_path` values
/// are taken relative to `root`. Files outside the root get a `../` key.
pub fn relative_key(root: &Path, file_path: &Path) -> String {
    let target = absolutize(root, file_path);

    let root_parts: Vec<Component> = root.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let common = root_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..root_parts.len() {
        parts.push("..".to_string());
    }
    for component in &target_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
