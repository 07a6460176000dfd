//! Asset revisioning (cache busting).
//!
//! Production builds rewrite `{revv: path}` placeholders in HTML into
//! references to content-fingerprinted copies of the assets, so far-future
//! cache headers stay safe across deploys. The flow per build:
//!
//! 1. staged assets register in the [`Revisioner`] manifest,
//! 2. every manifest entry gets a content fingerprint,
//! 3. `compile` rewrites the placeholders in each HTML page, relative to
//!    the page's own directory,
//! 4. fingerprinted copies land next to the originals.
//!
//! Logical paths are root-relative to the output directory; a leading `/`
//! is accepted and stripped, so `/style.css` and `style.css` share one
//! manifest entry. A placeholder pointing at a file that does not exist in
//! the output passes through unchanged instead of failing the build.

mod hash;
mod placeholder;

pub use hash::{content_hash, hash_bytes, revved_path};
pub use placeholder::PlaceholderSyntax;

use crate::log;
use crate::utils::fs::collect_files_with_ext;
use crate::utils::path::{relative_from, to_slash};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevvError {
    #[error("IO error when revving `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid percent-encoding in placeholder `{0}`")]
    Decode(String, #[source] std::string::FromUtf8Error),
}

/// Logical asset path to its fingerprinted counterpart.
///
/// `None` means registered but not yet fingerprinted. An entry whose value
/// equals its key is an asset missing from the output, kept as passthrough.
pub type Manifest = BTreeMap<String, Option<String>>;

/// Pluggable fingerprint strategy.
///
/// Receives the normalized root-relative path of the asset and returns the
/// complete fingerprinted path, which is used verbatim. The default
/// strategy reads the file under the output root, hashes its content, and
/// inserts the hash before the last extension; an injected strategy is
/// consulted for every path, including ones with no file on disk.
pub type HashingMethod = Box<dyn Fn(&str) -> Result<String, RevvError> + Send + Sync>;

/// Per-build revisioning state.
///
/// Fingerprints are memoized for the lifetime of the struct, so each asset
/// is read and hashed at most once per build no matter how many pages
/// reference it. Watch-mode rebuilds construct a fresh `Revisioner`.
pub struct Revisioner {
    output: PathBuf,
    production: bool,
    manifest: RwLock<Manifest>,
    revved: RwLock<HashMap<String, String>>,
    hashing: HashingMethod,
}

impl Revisioner {
    pub fn new(output: impl Into<PathBuf>, production: bool) -> Self {
        let output = output.into();
        let hash_root = output.clone();
        Self {
            output,
            production,
            manifest: RwLock::new(Manifest::new()),
            revved: RwLock::new(HashMap::new()),
            // Default strategy: blake3 over the file content, hash inserted
            // before the last extension. Missing files pass through with
            // their path unchanged.
            hashing: Box::new(move |key| {
                let absolute = hash_root.join(key);
                if !absolute.is_file() {
                    return Ok(key.to_string());
                }
                let hash =
                    content_hash(&absolute).map_err(|err| RevvError::Io(absolute.clone(), err))?;
                Ok(revved_path(key, &hash))
            }),
        }
    }

    /// Swap in a different fingerprint function.
    pub fn with_hashing_method(mut self, hashing: HashingMethod) -> Self {
        self.hashing = hashing;
        self
    }

    /// Snapshot of the current manifest.
    pub fn manifest(&self) -> Manifest {
        self.manifest.read().clone()
    }

    /// Replace the manifest wholesale (keys get normalized).
    pub fn set_manifest(&self, manifest: Manifest) {
        *self.manifest.write() = manifest
            .into_iter()
            .map(|(key, value)| (normalize(&key).to_string(), value))
            .collect();
    }

    /// Register an asset path in the manifest. Idempotent; never clobbers
    /// an already-computed fingerprint.
    pub fn add(&self, path: &str) {
        self.manifest
            .write()
            .entry(normalize(path).to_string())
            .or_insert(None);
    }

    /// Fingerprinted path for a logical asset path, memoized per run.
    pub fn file_hash(&self, path: &str) -> Result<String, RevvError> {
        let key = normalize(path);
        if let Some(hit) = self.revved.read().get(key) {
            return Ok(hit.clone());
        }

        let revved = (self.hashing)(key)?;
        self.revved
            .write()
            .insert(key.to_string(), revved.clone());
        Ok(revved)
    }

    /// Fingerprint every registered asset and record it in the manifest.
    fn fingerprint_manifest(&self) -> Result<(), RevvError> {
        let keys: Vec<String> = self.manifest.read().keys().cloned().collect();

        let entries = keys
            .par_iter()
            .map(|key| Ok((key.clone(), self.file_hash(key)?)))
            .collect::<Result<Vec<_>, RevvError>>()?;

        let mut manifest = self.manifest.write();
        for (key, revved) in entries {
            manifest.insert(key, Some(revved));
        }
        Ok(())
    }

    /// Rewrite one HTML page in place.
    pub fn compile(&self, page: &Path) -> Result<(), RevvError> {
        let content =
            fs::read_to_string(page).map_err(|err| RevvError::Io(page.to_path_buf(), err))?;
        let rel = to_slash(page.strip_prefix(&self.output).unwrap_or(page));

        let rewritten = self.convert(&content, &rel)?;
        if rewritten != content {
            log!("revv"; "{rel}");
            fs::write(page, rewritten).map_err(|err| RevvError::Io(page.to_path_buf(), err))?;
        }
        Ok(())
    }

    /// Rewrite every placeholder in one HTML page.
    ///
    /// `page_path` is the page's location relative to the output root;
    /// replacements are computed relative to the page's directory, so a
    /// page at `blog/index.html` referencing `/assets/cover.png` gets
    /// `../assets/cover.<hash>.png`.
    pub fn convert(&self, content: &str, page_path: &str) -> Result<String, RevvError> {
        let base = Path::new(page_path).parent().unwrap_or(Path::new(""));

        let content = PlaceholderSyntax::literal()
            .rewrite(content, |logical| self.resolve(logical, base))?;
        PlaceholderSyntax::encoded().rewrite(&content, |logical| self.resolve(logical, base))
    }

    /// Resolve one placeholder path to its page-relative fingerprinted form,
    /// registering the asset in the manifest along the way.
    fn resolve(&self, logical: &str, base: &Path) -> Result<String, RevvError> {
        let key = normalize(logical);
        let revved = self.file_hash(key)?;
        self.manifest
            .write()
            .insert(key.to_string(), Some(revved.clone()));
        Ok(to_slash(&relative_from(Path::new(&revved), base)))
    }

    /// Full revisioning pass over the output directory. Dev builds skip it
    /// entirely so placeholders stay visible in the output.
    pub fn run(&self) -> Result<(), RevvError> {
        if !self.production {
            log!("revv"; "skipped (dev build)");
            return Ok(());
        }
        let start = std::time::Instant::now();

        self.fingerprint_manifest()?;

        let pages = collect_files_with_ext(&self.output, "html");
        pages.par_iter().try_for_each(|page| self.compile(page))?;

        let mut copied = 0;
        for (key, revved) in self.manifest.read().iter() {
            let Some(revved) = revved else { continue };
            if revved == key {
                continue;
            }
            let source = self.output.join(key);
            let target = self.output.join(revved);
            fs::copy(&source, &target).map_err(|err| RevvError::Io(source.clone(), err))?;
            copied += 1;
        }
        log!("revv"; "revved {copied} assets in {:.2?}", start.elapsed());

        Ok(())
    }
}

/// Strip the leading `/` from a root-relative logical path.
fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}
