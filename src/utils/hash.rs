//! Content fingerprints using blake3.

/// Full blake3 digest of `content` as lowercase hex.
#[inline]
pub fn content_hex(content: &str) -> String {
    hex::encode(blake3::hash(content.as_bytes()).as_bytes())
}
