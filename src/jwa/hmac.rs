//! HMAC signing

use std::fmt;

use crate::error::{self, SignerError};
use crate::jws;

/// HMAC signing algorithms
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum SigningAlgorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl SigningAlgorithm {
    /// The algorithm identifier as it appears in a token header
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }

    /// The size in bytes of a signature produced by this algorithm
    #[must_use]
    pub fn signature_size(self) -> usize {
        match self {
            Self::HS256 => 256 / 8,
            Self::HS384 => 384 / 8,
            Self::HS512 => 512 / 8,
        }
    }

    fn into_ring_algorithm(self) -> ring::hmac::Algorithm {
        match self {
            SigningAlgorithm::HS256 => ring::hmac::HMAC_SHA256,
            SigningAlgorithm::HS384 => ring::hmac::HMAC_SHA384,
            SigningAlgorithm::HS512 => ring::hmac::HMAC_SHA512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signer for the HS256, HS384, and HS512 algorithms
///
/// The key is the shared secret itself; any non-empty string is
/// accepted.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct HmacSigner {
    alg: SigningAlgorithm,
}

impl HmacSigner {
    /// An HMAC signer for the given hash strength
    pub const fn new(alg: SigningAlgorithm) -> Self {
        Self { alg }
    }

    fn compute(&self, data: &[u8], key: &str) -> ring::hmac::Tag {
        let key = ring::hmac::Key::new(self.alg.into_ring_algorithm(), key.as_bytes());
        ring::hmac::sign(&key, data)
    }
}

impl jws::Signer for HmacSigner {
    fn algorithm(&self) -> &str {
        self.alg.as_str()
    }

    fn is_valid_key(&self, key: &str) -> bool {
        !key.is_empty()
    }

    fn sign(&self, signing_input: &[u8], key: &str) -> Result<Vec<u8>, SignerError> {
        if !self.is_valid_key(key) {
            return Err(error::invalid_key(self.alg.as_str()).into());
        }

        Ok(self.compute(signing_input, key).as_ref().to_vec())
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &str) -> bool {
        if !self.is_valid_key(key) {
            return false;
        }

        let expected = self.compute(signing_input, key);

        // Length is not a secret; only the comparison of equal-length
        // tags must be constant-time.
        if signature.len() != expected.as_ref().len() {
            return false;
        }

        ring::constant_time::verify_slices_are_equal(expected.as_ref(), signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::jws::Signer;

    use super::*;

    #[test]
    fn rejects_empty_key() {
        let signer = HmacSigner::new(SigningAlgorithm::HS256);
        assert!(!signer.is_valid_key(""));
        assert!(signer.sign(b"data", "").is_err());
        assert!(!signer.verify(b"data", b"anything", ""));
    }

    #[test]
    fn round_trips_each_strength() {
        for alg in [
            SigningAlgorithm::HS256,
            SigningAlgorithm::HS384,
            SigningAlgorithm::HS512,
        ] {
            let signer = HmacSigner::new(alg);
            let signature = signer.sign(b"signing input", "secret").unwrap();
            assert_eq!(signature.len(), alg.signature_size());
            assert!(signer.verify(b"signing input", &signature, "secret"));
        }
    }

    #[test]
    fn rejects_tampered_input_and_wrong_key() {
        let signer = HmacSigner::new(SigningAlgorithm::HS256);
        let signature = signer.sign(b"signing input", "secret").unwrap();

        assert!(!signer.verify(b"signing inpuT", &signature, "secret"));
        assert!(!signer.verify(b"signing input", &signature, "wrong-secret"));

        let mut flipped = signature.clone();
        flipped[0] ^= 0x01;
        assert!(!signer.verify(b"signing input", &flipped, "secret"));
    }

    #[test]
    fn rejects_length_mismatch_before_comparing() {
        let signer = HmacSigner::new(SigningAlgorithm::HS256);
        let signature = signer.sign(b"signing input", "secret").unwrap();
        assert!(!signer.verify(b"signing input", &signature[..31], "secret"));
        assert!(!signer.verify(b"signing input", b"", "secret"));
    }

    #[test]
    fn strengths_produce_distinct_signatures() {
        let hs256 = HmacSigner::new(SigningAlgorithm::HS256);
        let hs384 = HmacSigner::new(SigningAlgorithm::HS384);

        let a = hs256.sign(b"signing input", "secret").unwrap();
        let b = hs384.sign(b"signing input", "secret").unwrap();
        assert_ne!(a, b);
    }
}
