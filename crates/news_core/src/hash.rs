use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const CONTENT_HASH_LEN: usize = 16;

/// Stable, filesystem-safe identifier for a link: the first 16 lowercase hex
/// characters of SHA-256 over the UTF-8 bytes of `url`.
///
/// Names the cover image and the output document, so repeated runs for the
/// same link land on the same files.
pub fn content_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut hex = String::with_capacity(CONTENT_HASH_LEN);
    for byte in digest.iter().take(CONTENT_HASH_LEN / 2) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
