//! Artifact Fingerprinting
//!
//! Short, stable identifiers for scored artifacts. A fingerprint is the
//! first 8 bytes of the SHA-256 digest, hex encoded (16 lowercase chars).
//!
//! Fingerprints label and deduplicate verdicts. The truncation brings the
//! collision bound down to roughly 2^32 artifacts, so they are not usable
//! as integrity checksums.

use sha2::{Digest, Sha256};

/// Number of digest bytes kept in the fingerprint
const FINGERPRINT_BYTES: usize = 8;

/// Compute the fingerprint of an artifact identifier
pub fn fingerprint(artifact: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(artifact.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_length() {
        assert_eq!(fingerprint("http://example.com").len(), 16);
    }

    #[test]
    fn test_fingerprint_stable() {
        let a = fingerprint("http://example.com/login");
        let b = fingerprint("http://example.com/login");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_known_vectors() {
        // First 8 bytes of the SHA-256 digests of "" and "abc"
        assert_eq!(fingerprint(""), "e3b0c44298fc1c14");
        assert_eq!(fingerprint("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn test_fingerprint_distinguishes_inputs() {
        assert_ne!(
            fingerprint("http://example.com"),
            fingerprint("http://example.org")
        );
    }
}
