//! `[build]` section configuration.
//!
//! Contains build settings: paths, theme fallback, clean/production switches.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in norska.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// source = "src"            # Project source directory
/// output = "dist"           # Build output directory
/// theme = "../shared-theme" # Optional fallback source root
/// production = false        # Gates the revv pass
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Project source directory (pages, assets, `_data/`).
    #[serde(default = "defaults::build::source")]
    #[educe(Default = defaults::build::source())]
    pub source: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Fallback theme root; its `_data/` only fills keys the project leaves
    /// unset. Tilde-expanded, may live outside the project.
    #[serde(default = "defaults::build::theme", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::build::theme())]
    pub theme: Option<PathBuf>,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Production mode: gates fingerprinting and other release-only steps.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub production: bool,
}
