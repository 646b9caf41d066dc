//! # Keccak-256
//!
//! Ethereum's keccak-256 (original Keccak padding, not NIST SHA3-256).

use anonvote_core::Bytes32;
use sha3::{Digest, Keccak256};

/// Compute keccak-256 of raw bytes.
pub fn keccak256(data: impl AsRef<[u8]>) -> Bytes32 {
    let hash = Keccak256::digest(data.as_ref());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    Bytes32(out)
}

/// Hash two nodes in ascending byte order: `keccak256(min || max)`.
///
/// Sorting makes the parent independent of which side each child sits on,
/// which is what lets a verifier drop side information from the proof.
pub fn hash_pair_sorted(a: &Bytes32, b: &Bytes32) -> Bytes32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut input = [0u8; 64];
    input[..32].copy_from_slice(lo.as_bytes());
    input[32..].copy_from_slice(hi.as_bytes());
    keccak256(input)
}
