//! Content fingerprints.

use sha2::{Digest, Sha256};

/// SHA-256 of the raw document text as lowercase hex. Stable across process
/// restarts and platforms.
pub fn fingerprint(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}
