//! # Content Digest
//!
//! SHA-256 over [`CanonicalBytes`]. Used as a content key (for example, the
//! eligibility index caches a region's tree under the digest of its code
//! list) and never for anything that has to match the chain; on-chain
//! hashing is keccak-256 and lives in `anonvote-crypto`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A SHA-256 content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// Accepts only `&CanonicalBytes`, so two logically equal values always
/// hash identically.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_digest_deterministic() {
        let cb = CanonicalBytes::new(&vec!["400001", "400002"]).unwrap();
        assert_eq!(sha256_digest(&cb), sha256_digest(&cb));
    }

    #[test]
    fn test_known_sha256_vector() {
        // SHA256("{}")
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_digest(&cb).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_display_prefix() {
        let cb = CanonicalBytes::new(&serde_json::json!([])).unwrap();
        let s = sha256_digest(&cb).to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn test_order_matters_for_sequences() {
        let a = CanonicalBytes::new(&vec!["1", "2"]).unwrap();
        let b = CanonicalBytes::new(&vec!["2", "1"]).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }
}
