// crates/atlas-core/src/hashing.rs
// ============================================================================
// Module: Atlas Content Hashing
// Description: SHA-1 digests for content-addressed include guards.
// Purpose: Derive guard suffixes that change whenever the rendered body does.
// Dependencies: sha1
// ============================================================================

//! ## Overview
//! Include guards are derived from the SHA-1 digest of the full rendered
//! body, so two headers with different content can never share a guard.
//! Callers always hash the complete body at once; no streaming API is needed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha1::Digest;
use sha1::Sha1;

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns the 40-character lowercase hex SHA-1 digest of `bytes`.
///
/// # Examples
/// ```
/// assert_eq!(atlas_core::sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
#[must_use]
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex_encode(&digest)
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[usize::from(byte >> 4)] as char);
        out.push(HEX[usize::from(byte & 0x0f)] as char);
    }
    out
}
