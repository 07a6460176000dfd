//! Relative path math between locations inside the output tree.

use std::path::{Component, Path, PathBuf};

/// Compute the path of `target` relative to the directory `base_dir`.
///
/// Both inputs must be relative to the same root. `.` components are
/// ignored; the result climbs out of `base_dir` with `..` segments before
/// descending into `target`.
pub fn relative_from(target: &Path, base_dir: &Path) -> PathBuf {
    let target: Vec<Component> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let base: Vec<Component> = base_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for component in &target[common..] {
        out.push(component);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Forward-slash string form of a path, for URLs and placeholders.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
