//! Layered site data loading.
//!
//! Data files live under `_data/` in each source root and merge into one
//! nested mapping addressed by dot-path keys derived from file locations:
//! `_data/site.json` lands at `site`, `_data/projects/2020/firost.json` at
//! `projects.2020.firost`.
//!
//! Sources form an ordered override list: the project root comes first, a
//! theme root follows as fallback. A key set by an earlier source is never
//! overwritten by a later one.

mod read;
mod store;

pub use read::{data_key, read};
pub use store::{DATA_DIR, DataStore};

use std::path::PathBuf;
use thiserror::Error;

/// Data loading errors. A single bad file aborts the whole pass.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error when reading data file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Invalid TOML in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),
}
