pub mod config;
pub mod html;
pub mod time;

use sha2::{Digest, Sha256};

/// Hash an identity (email) into an opaque lowercase hex key for avatar lookup.
///
/// The identity is trimmed and lowercased first, so case and surrounding
/// whitespace variants of one address share a digest. Returns `None` for an
/// empty identity rather than hashing the empty string.
pub fn identity_digest(identity: &str) -> Option<String> {
    let normalized = identity.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    Some(hex::encode(Sha256::digest(normalized.as_bytes())))
}
