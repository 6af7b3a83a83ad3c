//! Content-addressed bookkeeping for copied files.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn digest_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Digest → vault-relative path of the first stored copy.
#[derive(Debug, Default, Clone)]
pub struct ContentStore {
    by_digest: HashMap<String, String>,
}

impl ContentStore {
    /// Stored path for `digest`, if any.
    #[must_use]
    pub fn get(&self, digest: &str) -> Option<&str> {
        self.by_digest.get(digest).map(String::as_str)
    }

    /// Records `path` as the stored copy of `digest`. The first path wins.
    pub fn insert(&mut self, digest: String, path: String) {
        self.by_digest.entry(digest).or_insert(path);
    }

    /// Number of distinct contents stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}
