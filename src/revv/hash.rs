//! Content fingerprinting for output assets.
//!
//! Uses a blake3 content hash so identical bytes always yield the same
//! fingerprint and any content change yields a new one, busting browser
//! caches through the filename.

use std::fs;
use std::io;
use std::path::Path;

/// Length of the hex fingerprint embedded in filenames.
const HASH_LEN: usize = 8;

/// Compute the content fingerprint of a file.
pub fn content_hash(path: &Path) -> io::Result<String> {
    let content = fs::read(path)?;
    Ok(hash_bytes(&content))
}

/// Fingerprint raw bytes (first 8 hex chars of blake3).
pub fn hash_bytes(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hex::encode(&hash.as_bytes()[..HASH_LEN / 2])
}

/// Insert a fingerprint right before the last extension of a filename.
///
/// `scripts.js.map` becomes `scripts.js.<hash>.map`, not
/// `scripts.<hash>.js.map`. Names without an extension get the fingerprint
/// appended.
pub fn revved_path(path: &str, hash: &str) -> String {
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    };

    let revved_name = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}.{hash}.{ext}"),
        _ => format!("{name}.{hash}"),
    };

    match dir {
        Some(dir) => format!("{dir}/{revved_name}"),
        None => revved_name,
    }
}
