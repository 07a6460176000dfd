//! Site configuration management for `norska.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                       |
//! |-----------|-----------------------------------------------|
//! | `[build]` | Source/output paths, theme, clean, production |
//! | `[revv]`  | Asset revisioning switch                      |
//! | `[extra]` | User-defined custom fields                    |
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "src"
//! output = "dist"
//! theme = "~/themes/norska-default"
//!
//! [revv]
//! enable = true
//!
//! [extra]
//! analytics_id = "UA-12345"
//! ```

mod build;
pub mod defaults;
mod error;
mod revv;

pub use build::BuildConfig;
pub use revv::RevvConfig;

use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing norska.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Asset revisioning settings
    #[serde(default)]
    pub revv: RevvConfig,

    /// User-defined extra fields
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Whether production-gated build steps (asset revisioning) should run.
    pub const fn is_production(&self) -> bool {
        self.build.production
    }

    /// Resolve a logical path under the build output root.
    ///
    /// A leading `/` means "relative to the output root", so it is stripped
    /// before joining.
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.build.output.join(relative.trim_start_matches('/'))
    }

    /// Data source roots in precedence order: project first, theme fallback.
    pub fn data_sources(&self) -> Vec<PathBuf> {
        let mut sources = vec![self.build.source.clone()];
        if let Some(theme) = &self.build.theme {
            sources.push(theme.clone());
        }
        sources
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        // Determine the final root path based on command
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli
                .root
                .as_ref()
                .cloned()
                .unwrap_or_else(|| self.get_root().to_owned()),
        };

        self.set_root(&root);
        self.update_path_with_root(&root);

        if let Commands::Build { build_args } = &cli.command {
            if build_args.clean {
                self.build.clean = true;
            }
            Self::update_option(&mut self.build.production, build_args.production.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let cli = self.get_cli();

        // Apply CLI overrides first
        Self::update_option(&mut self.build.source, cli.source.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        // Normalize root to absolute path
        let root = Self::normalize_path(root);
        self.set_root(&root);

        // Normalize config path
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        // Normalize all directory paths
        self.build.source = Self::normalize_path(&root.join(&self.build.source));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));

        // Normalize theme path (with tilde expansion; may live outside the project)
        if let Some(theme) = self.build.theme.take() {
            let expanded = shellexpand::tilde(&theme.to_string_lossy()).into_owned();
            let path = PathBuf::from(expanded);
            self.build.theme = Some(if path.is_relative() {
                Self::normalize_path(&root.join(path))
            } else {
                Self::normalize_path(&path)
            });
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if !self.build.source.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.source] not found: {}",
                self.build.source.display()
            )));
        }

        if let Some(theme) = &self.build.theme
            && !theme.is_dir()
        {
            bail!(ConfigError::Validation(format!(
                "[build.theme] not found: {}",
                theme.display()
            )));
        }

        Ok(())
    }
}
