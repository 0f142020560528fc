//! ECDSA signing
//!
//! Keys are PEM-encoded and parsed with openssl, which also performs the
//! signing and verification (it covers all three curves, including
//! P-521). The crypto primitive speaks ASN.1 DER, while tokens embed the
//! fixed-width IEEE P1363 form; the [`der`] module translates between
//! the two.

use std::fmt;

use once_cell::sync::Lazy;
use openssl::ec::{EcGroup, EcGroupRef};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{HasPublic, PKey, PKeyRef, Private, Public};

use crate::error::{self, SignerError};
use crate::jws;

pub mod der;

static P256: Lazy<EcGroup> =
    Lazy::new(|| EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).expect("P-256 is always known"));
static P384: Lazy<EcGroup> =
    Lazy::new(|| EcGroup::from_curve_name(Nid::SECP384R1).expect("P-384 is always known"));
static P521: Lazy<EcGroup> =
    Lazy::new(|| EcGroup::from_curve_name(Nid::SECP521R1).expect("P-521 is always known"));

/// A named ECC curve
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Curve {
    /// The P-256 curve (prime256v1/secp256r1)
    P256,

    /// The P-384 curve (secp384r1)
    P384,

    /// The P-521 curve (secp521r1)
    P521,
}

impl Curve {
    pub(crate) fn to_group(self) -> &'static EcGroupRef {
        match self {
            Curve::P256 => &P256,
            Curve::P384 => &P384,
            Curve::P521 => &P521,
        }
    }

    fn from_nid(nid: Nid) -> Option<Self> {
        match nid {
            Nid::X9_62_PRIME256V1 => Some(Curve::P256),
            Nid::SECP384R1 => Some(Curve::P384),
            Nid::SECP521R1 => Some(Curve::P521),
            _ => None,
        }
    }
}

/// ECDSA signing algorithms
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum SigningAlgorithm {
    /// ECDSA using the P-256 curve and SHA-256
    ES256,
    /// ECDSA using the P-384 curve and SHA-384
    ES384,
    /// ECDSA using the P-521 curve and SHA-512
    ES512,
}

impl SigningAlgorithm {
    /// The algorithm identifier as it appears in a token header
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
        }
    }

    /// The curve a key must be on to be usable with this algorithm
    #[must_use]
    pub fn curve(self) -> Curve {
        match self {
            Self::ES256 => Curve::P256,
            Self::ES384 => Curve::P384,
            Self::ES512 => Curve::P521,
        }
    }

    /// The width in bytes of each of the two fixed-width signature
    /// components
    #[must_use]
    pub const fn component_len(self) -> usize {
        match self {
            Self::ES256 => 32,
            Self::ES384 => 48,
            Self::ES512 => 66,
        }
    }

    /// The total size in bytes of a fixed-width signature
    #[must_use]
    pub const fn signature_size(self) -> usize {
        self.component_len() * 2
    }

    fn message_digest(self) -> MessageDigest {
        match self {
            Self::ES256 => MessageDigest::sha256(),
            Self::ES384 => MessageDigest::sha384(),
            Self::ES512 => MessageDigest::sha512(),
        }
    }
}

impl From<Curve> for SigningAlgorithm {
    fn from(crv: Curve) -> Self {
        match crv {
            Curve::P256 => Self::ES256,
            Curve::P384 => Self::ES384,
            Curve::P521 => Self::ES512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signer for the ES256, ES384, and ES512 algorithms
///
/// A key is valid only when it parses as an EC key on the exact curve
/// the algorithm requires.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct EcdsaSigner {
    alg: SigningAlgorithm,
}

impl EcdsaSigner {
    /// An ECDSA signer for the given curve and hash strength
    pub const fn new(alg: SigningAlgorithm) -> Self {
        Self { alg }
    }

    fn verify_with<T: HasPublic>(&self, pkey: &PKeyRef<T>, data: &[u8], der: &[u8]) -> bool {
        let Ok(mut verifier) = openssl::sign::Verifier::new(self.alg.message_digest(), pkey)
        else {
            return false;
        };

        verifier.update(data).is_ok() && verifier.verify(der).unwrap_or(false)
    }
}

fn private_key_on_curve(key: &str) -> Option<(PKey<Private>, Curve)> {
    let pkey = PKey::private_key_from_pem(key.as_bytes()).ok()?;
    let curve = curve_of(pkey.ec_key().ok()?.group())?;
    Some((pkey, curve))
}

fn public_key_on_curve(key: &str) -> Option<(PKey<Public>, Curve)> {
    let pkey = PKey::public_key_from_pem(key.as_bytes()).ok()?;
    let curve = curve_of(pkey.ec_key().ok()?.group())?;
    Some((pkey, curve))
}

fn curve_of(group: &EcGroupRef) -> Option<Curve> {
    Curve::from_nid(group.curve_name()?)
}

impl jws::Signer for EcdsaSigner {
    fn algorithm(&self) -> &str {
        self.alg.as_str()
    }

    fn is_valid_key(&self, key: &str) -> bool {
        let curve = private_key_on_curve(key)
            .map(|(_, curve)| curve)
            .or_else(|| public_key_on_curve(key).map(|(_, curve)| curve));

        curve == Some(self.alg.curve())
    }

    fn sign(&self, signing_input: &[u8], key: &str) -> Result<Vec<u8>, SignerError> {
        let (pkey, curve) =
            private_key_on_curve(key).ok_or_else(|| error::invalid_key(self.alg.as_str()))?;
        if curve != self.alg.curve() {
            return Err(error::invalid_key(self.alg.as_str()).into());
        }

        let mut signer = openssl::sign::Signer::new(self.alg.message_digest(), &pkey)
            .map_err(|e| error::signing_failure(e.to_string()))?;
        signer
            .update(signing_input)
            .map_err(|e| error::signing_failure(e.to_string()))?;
        let der_signature = signer
            .sign_to_vec()
            .map_err(|e| error::signing_failure(e.to_string()))?;

        // Tokens embed the fixed-width form, not the DER the primitive
        // emits.
        der::der_to_fixed(&der_signature, self.alg.component_len())
            .map_err(|e| error::signing_failure(e).into())
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &str) -> bool {
        let Ok(der_signature) = der::fixed_to_der(signature, self.alg.component_len()) else {
            return false;
        };

        if let Some((pkey, curve)) = public_key_on_curve(key) {
            return curve == self.alg.curve()
                && self.verify_with(&pkey, signing_input, &der_signature);
        }

        // The public half of a private key verifies just as well.
        if let Some((pkey, curve)) = private_key_on_curve(key) {
            return curve == self.alg.curve()
                && self.verify_with(&pkey, signing_input, &der_signature);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use crate::jws::Signer;
    use crate::test;

    use super::*;

    fn signer_and_keys(alg: SigningAlgorithm) -> (EcdsaSigner, &'static str, &'static str) {
        let (private_pem, public_pem) = match alg {
            SigningAlgorithm::ES256 => (test::ec::P256_PRIVATE_PEM, test::ec::P256_PUBLIC_PEM),
            SigningAlgorithm::ES384 => (test::ec::P384_PRIVATE_PEM, test::ec::P384_PUBLIC_PEM),
            SigningAlgorithm::ES512 => (test::ec::P521_PRIVATE_PEM, test::ec::P521_PUBLIC_PEM),
        };
        (EcdsaSigner::new(alg), private_pem, public_pem)
    }

    #[test]
    fn round_trips_each_curve() {
        for alg in [
            SigningAlgorithm::ES256,
            SigningAlgorithm::ES384,
            SigningAlgorithm::ES512,
        ] {
            let (signer, private_pem, public_pem) = signer_and_keys(alg);

            let signature = signer.sign(b"signing input", private_pem).unwrap();
            assert_eq!(signature.len(), alg.signature_size());

            assert!(signer.verify(b"signing input", &signature, public_pem));
            assert!(signer.verify(b"signing input", &signature, private_pem));
        }
    }

    #[test]
    fn requires_the_matching_curve() {
        let signer = EcdsaSigner::new(SigningAlgorithm::ES256);
        assert!(signer.is_valid_key(test::ec::P256_PRIVATE_PEM));
        assert!(signer.is_valid_key(test::ec::P256_PUBLIC_PEM));
        assert!(!signer.is_valid_key(test::ec::P384_PRIVATE_PEM));
        assert!(!signer.is_valid_key(test::ec::P521_PUBLIC_PEM));
        assert!(!signer.is_valid_key(test::rsa::PRIVATE_PEM));
        assert!(!signer.is_valid_key(""));

        let err = signer
            .sign(b"signing input", test::ec::P384_PRIVATE_PEM)
            .unwrap_err();
        assert!(matches!(err, SignerError::InvalidKey(_)));
    }

    #[test]
    fn rejects_tampered_signatures() {
        let (signer, private_pem, public_pem) = signer_and_keys(SigningAlgorithm::ES256);
        let mut signature = signer.sign(b"signing input", private_pem).unwrap();

        assert!(!signer.verify(b"signing inpuT", &signature, public_pem));

        signature[10] ^= 0x01;
        assert!(!signer.verify(b"signing input", &signature, public_pem));
    }

    #[test]
    fn rejects_malformed_signature_lengths() {
        let (signer, private_pem, public_pem) = signer_and_keys(SigningAlgorithm::ES256);
        let signature = signer.sign(b"signing input", private_pem).unwrap();

        assert!(!signer.verify(b"signing input", &signature[..63], public_pem));
        assert!(!signer.verify(b"signing input", b"", public_pem));
    }

    #[test]
    fn signatures_do_not_verify_across_curves() {
        let (es256, p256_private, _) = signer_and_keys(SigningAlgorithm::ES256);
        let (es384, _, p384_public) = signer_and_keys(SigningAlgorithm::ES384);

        let signature = es256.sign(b"signing input", p256_private).unwrap();
        assert!(!es384.verify(b"signing input", &signature, p384_public));
    }
}
