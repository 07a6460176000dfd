//! Data file parsing and store key derivation.

use super::DataError;
use serde_json::Value;
use std::path::{Component, Path};

/// Parse a single data file into a JSON value.
///
/// `.json` files parse as JSON; `.toml` files parse as TOML and convert to
/// an equivalent JSON value. Unrecognized extensions read as `None` so
/// stray files under `_data/` are skipped rather than failing the build.
pub fn read(path: &Path) -> Result<Option<Value>, DataError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if ext != "json" && ext != "toml" {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| DataError::Io(path.to_path_buf(), err))?;

    let value = match ext {
        "json" => serde_json::from_str(&content)
            .map_err(|err| DataError::Json(path.to_path_buf(), err))?,
        _ => {
            let table: toml::Value = toml::from_str(&content)
                .map_err(|err| DataError::Toml(path.to_path_buf(), err))?;
            serde_json::to_value(table)
                .map_err(|err| DataError::Json(path.to_path_buf(), err))?
        }
    };

    Ok(Some(value))
}

/// Derive the dot-separated store key for a data file.
///
/// `rel_path` is the file's location relative to its `_data` root: directory
/// separators become dots and the extension is stripped.
///
/// # Examples
/// ```ignore
/// data_key(Path::new("site.json"))                  // → "site"
/// data_key(Path::new("projects/2020/firost.json"))  // → "projects.2020.firost"
/// ```
pub fn data_key(rel_path: &Path) -> String {
    rel_path
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(os) => os.to_str().map(str::to_string),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_data_key_flat_file() {
        assert_eq!(data_key(Path::new("site.json")), "site");
    }

    #[test]
    fn test_data_key_nested_file() {
        assert_eq!(
            data_key(Path::new("projects/2020/firost.json")),
            "projects.2020.firost"
        );
    }

    #[test]
    fn test_data_key_toml_file() {
        assert_eq!(data_key(Path::new("nav/header.toml")), "nav.header");
    }

    #[test]
    fn test_data_key_is_deterministic() {
        let path = Path::new("a/b/c.json");
        assert_eq!(data_key(path), data_key(path));
        assert_eq!(data_key(path), "a.b.c");
    }

    #[test]
    fn test_read_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.json");
        fs::write(&path, r#"{"title": "My site", "count": 3}"#).unwrap();

        let value = read(&path).unwrap().unwrap();
        assert_eq!(value["title"], "My site");
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn test_read_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nav.toml");
        fs::write(&path, "title = \"Nav\"\nlinks = [\"home\", \"about\"]\n").unwrap();

        let value = read(&path).unwrap().unwrap();
        assert_eq!(value["title"], "Nav");
        assert_eq!(value["links"][1], "about");
    }

    #[test]
    fn test_read_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "not data").unwrap();

        assert!(read(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_malformed_json_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = read(&path).unwrap_err();
        assert!(matches!(err, DataError::Json(_, _)));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let err = read(Path::new("/nonexistent/site.json")).unwrap_err();
        assert!(matches!(err, DataError::Io(_, _)));
    }
}
