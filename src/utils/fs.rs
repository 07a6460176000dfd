//! File collection helpers over directory trees.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files never picked up from a source or output tree.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Recursively collect every regular file under `dir`, sorted for
/// deterministic processing order.
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Collect files under `dir` whose extension matches `ext`.
pub fn collect_files_with_ext(dir: &Path, ext: &str) -> Vec<PathBuf> {
    collect_files(dir)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|e| e == ext))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/z.txt"), "z").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.txt"));
        assert!(files[1].ends_with("b/nested/z.txt"));
    }

    #[test]
    fn test_collect_files_skips_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();
        fs::write(dir.path().join("keep.css"), "body {}").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.css"));
    }

    #[test]
    fn test_collect_files_with_ext() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("index.html"), "<html>").unwrap();
        fs::write(dir.path().join("blog/index.html"), "<html>").unwrap();
        fs::write(dir.path().join("cover.png"), "png").unwrap();

        let html = collect_files_with_ext(dir.path(), "html");
        assert_eq!(html.len(), 2);
        assert!(html.iter().all(|p| p.extension().unwrap() == "html"));
    }

    #[test]
    fn test_collect_files_missing_dir() {
        let files = collect_files(Path::new("/nonexistent/norska-test"));
        assert!(files.is_empty());
    }
}
