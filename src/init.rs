//! Scaffold a new site directory.

use crate::config::SiteConfig;
use crate::log;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Directories every fresh site starts with.
const SITE_DIRS: &[&str] = &["src", "src/_data", "src/assets"];

const DEFAULT_SITE_DATA: &str = r#"{
  "title": "My new site",
  "description": ""
}
"#;

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <link rel="stylesheet" href="{revv: assets/style.css}">
  </head>
  <body>
    <h1>My new site</h1>
  </body>
</html>
"#;

/// Create a template site at the configured root.
///
/// `named` is set when the user passed an explicit site name, meaning the
/// target directory may not exist yet; an unnamed init works in the current
/// root, which must be empty enough to not clobber an existing project.
pub fn new_site(config: &SiteConfig, named: bool) -> Result<()> {
    let root = config.get_root();

    if !named && root.is_dir() && !is_dir_empty(root)? {
        bail!(
            "Directory {} is not empty. Pass a site name to init into a subdirectory.",
            root.display()
        );
    }

    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }

    let default_config =
        toml::to_string_pretty(&SiteConfig::default()).context("Failed to render config")?;
    fs::write(&config.config_path, default_config)
        .with_context(|| format!("Failed to write {}", config.config_path.display()))?;

    fs::write(root.join("src/_data/site.json"), DEFAULT_SITE_DATA)?;
    fs::write(root.join("src/index.html"), DEFAULT_INDEX)?;
    fs::write(root.join("src/assets/style.css"), "body {\n  margin: 0 auto;\n}\n")?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

fn is_dir_empty(dir: &Path) -> Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn init_config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("norska.toml");
        config
    }

    #[test]
    fn test_new_site_scaffolds_layout() {
        let dir = TempDir::new().unwrap();
        let config = init_config(dir.path());

        new_site(&config, false).unwrap();

        assert!(dir.path().join("norska.toml").is_file());
        assert!(dir.path().join("src/_data/site.json").is_file());
        assert!(dir.path().join("src/index.html").is_file());
        assert!(dir.path().join("src/assets/style.css").is_file());
    }

    #[test]
    fn test_new_site_config_parses_back() {
        let dir = TempDir::new().unwrap();
        let config = init_config(dir.path());

        new_site(&config, false).unwrap();

        let content = fs::read_to_string(dir.path().join("norska.toml")).unwrap();
        let parsed = SiteConfig::from_str(&content).unwrap();
        assert_eq!(parsed.build.source, PathBuf::from("src"));
        assert!(parsed.revv.enable);
    }

    #[test]
    fn test_new_site_refuses_nonempty_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("existing.txt"), "hi").unwrap();
        let config = init_config(dir.path());

        assert!(new_site(&config, false).is_err());
    }

    #[test]
    fn test_named_init_creates_subdirectory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("my-site");
        let config = init_config(&root);

        new_site(&config, true).unwrap();
        assert!(root.join("norska.toml").is_file());
    }
}
