//! Key material generation
//!
//! Produces the opaque key strings the signers consume: hex-encoded
//! HMAC secrets, and PEM-encoded RSA and EC key pairs. Nothing here is
//! needed on the signing or verification paths.

use std::fmt;

use openssl::ec::EcKey;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{self, KeyGenerationError};
use crate::jwa::{ec, Algorithm};

/// The smallest accepted HMAC secret, in bytes
pub const MIN_HMAC_SECRET_LEN: usize = 16;

/// The smallest accepted RSA modulus, in bits
pub const MIN_RSA_BITS: u32 = 2048;

/// A PEM-encoded asymmetric key pair
#[derive(Clone)]
#[must_use]
pub struct KeyPair {
    /// The private key (PKCS#8 PEM)
    pub private_pem: String,

    /// The public key (SPKI PEM)
    pub public_pem: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_pem", &"<redacted>")
            .field("public_pem", &self.public_pem)
            .finish()
    }
}

/// Key material for one algorithm: a shared secret or a key pair
#[derive(Clone)]
#[must_use]
pub enum KeyMaterial {
    /// An HMAC shared secret
    Secret(String),

    /// An asymmetric key pair
    Pair(KeyPair),
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("Secret(<redacted>)"),
            Self::Pair(pair) => f.debug_tuple("Pair").field(pair).finish(),
        }
    }
}

/// Generates a random hex-encoded HMAC secret of `len` bytes
///
/// # Errors
///
/// Returns an error if `len` is below [`MIN_HMAC_SECRET_LEN`] or the
/// system random source fails.
pub fn hmac_secret(len: usize) -> Result<String, KeyGenerationError> {
    if len < MIN_HMAC_SECRET_LEN {
        return Err(error::invalid_argument(format!(
            "HMAC secret length must be at least {MIN_HMAC_SECRET_LEN} bytes"
        ))
        .into());
    }

    let mut secret = vec![0; len];
    SystemRandom::new()
        .fill(&mut secret)
        .map_err(|_| error::key_generation_failed("random number generator failure"))?;

    Ok(hex::encode(secret))
}

/// Generates an RSA key pair with a modulus of `bits` bits
///
/// # Errors
///
/// Returns an error if `bits` is below [`MIN_RSA_BITS`] or key
/// generation fails.
pub fn rsa_key_pair(bits: u32) -> Result<KeyPair, KeyGenerationError> {
    if bits < MIN_RSA_BITS {
        return Err(error::invalid_argument(format!(
            "RSA key size must be at least {MIN_RSA_BITS} bits"
        ))
        .into());
    }

    let rsa = Rsa::generate(bits).map_err(|e| error::key_generation_failed(e.to_string()))?;
    let pkey = PKey::from_rsa(rsa).map_err(|e| error::key_generation_failed(e.to_string()))?;
    pem_pair(&pkey)
}

/// Generates an EC key pair on the given curve
///
/// # Errors
///
/// Returns an error if key generation fails.
pub fn ec_key_pair(curve: ec::Curve) -> Result<KeyPair, KeyGenerationError> {
    let key = EcKey::generate(curve.to_group())
        .map_err(|e| error::key_generation_failed(e.to_string()))?;
    let pkey = PKey::from_ec_key(key).map_err(|e| error::key_generation_failed(e.to_string()))?;
    pem_pair(&pkey)
}

/// Generates the appropriate key material for a standard algorithm
///
/// HMAC algorithms get a secret sized to the hash strength; RSA and
/// ECDSA algorithms get a PEM key pair on the recommended parameters.
///
/// # Errors
///
/// Returns an error if key generation fails.
pub fn for_algorithm(alg: Algorithm) -> Result<KeyMaterial, KeyGenerationError> {
    match alg {
        Algorithm::Hmac(alg) => hmac_secret(alg.signature_size()).map(KeyMaterial::Secret),
        Algorithm::Rsa(_) => rsa_key_pair(MIN_RSA_BITS).map(KeyMaterial::Pair),
        Algorithm::EllipticCurve(alg) => ec_key_pair(alg.curve()).map(KeyMaterial::Pair),
    }
}

fn pem_pair(pkey: &PKey<openssl::pkey::Private>) -> Result<KeyPair, KeyGenerationError> {
    let private = pkey
        .private_key_to_pem_pkcs8()
        .map_err(|e| error::key_generation_failed(e.to_string()))?;
    let public = pkey
        .public_key_to_pem()
        .map_err(|e| error::key_generation_failed(e.to_string()))?;

    Ok(KeyPair {
        private_pem: String::from_utf8(private)
            .map_err(|e| error::key_generation_failed(e.to_string()))?,
        public_pem: String::from_utf8(public)
            .map_err(|e| error::key_generation_failed(e.to_string()))?,
    })
}
