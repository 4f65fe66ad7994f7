//! Filesystem helpers.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// SHA-256 digest of a file's content. Blacklist entries are keyed by this
/// digest so moving or renaming a file does not break its exclusion.
pub fn content_digest(path: &Path) -> Result<[u8; 32]> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hasher.finalize().into())
}
