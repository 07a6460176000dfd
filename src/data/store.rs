//! Layered site data store.
//!
//! Collects every data file from an ordered list of source roots into a
//! single merged mapping. The first source (the project) always wins; later
//! sources (themes) only fill keys the project left unset.
//!
//! # Thread Safety
//!
//! Uses `RwLock` so the warmed store can be read concurrently during a
//! build while updates stay exclusive.

use super::DataError;
use super::read::{data_key, read};
use crate::utils::fs::collect_files;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Name of the data directory under each source root.
pub const DATA_DIR: &str = "_data";

/// Merged key-value store for site-wide data.
///
/// Constructed per build invocation; watch-mode rebuilds call
/// `clear_cache()` (or `update_cache()`) to pick up on-disk changes.
#[derive(Debug, Default)]
pub struct DataStore {
    /// Source roots in precedence order, first wins.
    sources: Vec<PathBuf>,
    store: RwLock<Map<String, Value>>,
}

impl DataStore {
    /// Create a cold store over the given source roots.
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            store: RwLock::new(Map::new()),
        }
    }

    /// Re-read every data file from disk and rebuild the merged mapping.
    ///
    /// Sources are processed strictly in order so the presence check for a
    /// fallback source observes the fully-applied earlier layers. Reads
    /// within one source run in parallel; results apply over the sorted
    /// file list, so a key collision inside a single source is
    /// last-write-wins (documented, not special-cased).
    pub fn update_cache(&self) -> Result<(), DataError> {
        let mut merged = Map::new();

        for (layer, source) in self.sources.iter().enumerate() {
            let data_root = source.join(DATA_DIR);
            if !data_root.is_dir() {
                continue;
            }

            let files = collect_files(&data_root);
            let entries = files
                .par_iter()
                .map(|path| {
                    let value = read(path)?;
                    let rel = path.strip_prefix(&data_root).unwrap_or(path);
                    Ok((data_key(rel), value))
                })
                .collect::<Result<Vec<_>, DataError>>()?;

            for (key, value) in entries {
                let Some(value) = value else { continue };
                if layer == 0 || !contains_key(&merged, &key) {
                    insert_at(&mut merged, &key, value);
                }
            }
        }

        *self.store.write() = merged;
        Ok(())
    }

    /// Populate the store only if it is currently empty.
    ///
    /// Idempotent: a second call without an intervening `clear_cache()`
    /// performs no disk I/O.
    pub fn warm_cache(&self) -> Result<(), DataError> {
        if self.store.read().is_empty() {
            self.update_cache()?;
        }
        Ok(())
    }

    /// Current merged mapping (empty if never warmed).
    pub fn get_all(&self) -> Map<String, Value> {
        self.store.read().clone()
    }

    /// Reset the store to empty, forcing the next warm to re-read from disk.
    pub fn clear_cache(&self) {
        self.store.write().clear();
    }

    /// Check if the store has any data.
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }
}

/// Check whether a dot-path key resolves to an existing value.
fn contains_key(map: &Map<String, Value>, key: &str) -> bool {
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = map;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            match current.get(segment) {
                Some(Value::Object(next)) => current = next,
                _ => return false,
            }
        }
    }
    current.contains_key(last)
}

/// Insert `value` at a dot-path key, creating intermediate objects.
///
/// An intermediate non-object value gets replaced by an object (last write
/// wins, consistent with in-source collision handling).
fn insert_at(map: &mut Map<String, Value>, key: &str, value: Value) {
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = map;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                unreachable!()
            };
            current = next;
        }
    }
    current.insert(last.to_string(), value);
}
