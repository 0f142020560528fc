//! The uniform signing contract
//!
//! A [`Signer`] binds one algorithm identifier to a pair of byte-string
//! operations over opaque key material. Key material is passed to every
//! call rather than held by the signer, so a single instance serves any
//! number of keys concurrently.

use crate::error::SignerError;

/// A token signer for exactly one algorithm
///
/// Implementations must be stateless with respect to keys: the key
/// string (an HMAC secret, or a PEM-encoded private or public key) is
/// supplied per call.
pub trait Signer: Send + Sync + std::fmt::Debug {
    /// The algorithm identifier this signer serves, as it appears in a
    /// token header
    fn algorithm(&self) -> &str;

    /// Whether the key material is usable with this signer's algorithm
    /// family
    fn is_valid_key(&self, key: &str) -> bool;

    /// Signs the signing input, returning the raw signature bytes that
    /// will be embedded in the token
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidKey`] if the key fails
    /// [`is_valid_key()`][Self::is_valid_key()] or cannot be used to
    /// sign, and [`SignerError::SigningFailure`] if the underlying
    /// cryptographic primitive fails.
    fn sign(&self, signing_input: &[u8], key: &str) -> Result<Vec<u8>, SignerError>;

    /// Verifies a signature over the signing input
    ///
    /// A malformed signature is never an error here; any failure
    /// verifies as `false`.
    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &str) -> bool;
}
