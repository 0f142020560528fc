//! Common errors

#![allow(missing_copy_implementations)]

use std::error::Error as StdError;

use thiserror::Error;

/// A caller-supplied value was rejected before any cryptographic work
#[derive(Debug, Error)]
#[error("invalid argument: {reason}")]
pub struct InvalidArgument {
    reason: String,
}

#[inline]
pub(crate) fn invalid_argument(reason: impl Into<String>) -> InvalidArgument {
    InvalidArgument {
        reason: reason.into(),
    }
}

/// The requested algorithm is not present in the registry
#[derive(Debug, Error)]
#[error("unsupported algorithm '{alg}', registered algorithms: {}", .supported.join(", "))]
pub struct UnsupportedAlgorithm {
    alg: String,
    supported: Vec<String>,
}

#[inline]
pub(crate) fn unsupported_algorithm(
    alg: impl Into<String>,
    supported: Vec<String>,
) -> UnsupportedAlgorithm {
    UnsupportedAlgorithm {
        alg: alg.into(),
        supported,
    }
}

impl UnsupportedAlgorithm {
    /// The algorithm identifier that was requested
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.alg
    }

    /// The algorithm identifiers that were registered at the time of the request
    #[must_use]
    pub fn supported(&self) -> &[String] {
        &self.supported
    }
}

/// The key cannot be used with the requested algorithm
#[derive(Debug, Error)]
#[error("invalid key for algorithm '{alg}'")]
pub struct InvalidKey {
    alg: String,
}

#[inline]
pub(crate) fn invalid_key(alg: impl Into<String>) -> InvalidKey {
    InvalidKey { alg: alg.into() }
}

/// The underlying cryptographic primitive failed despite a valid key
#[derive(Debug, Error)]
#[error("signing operation failed")]
pub struct SigningFailure {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

#[inline]
pub(crate) fn signing_failure(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> SigningFailure {
    SigningFailure {
        source: source.into(),
    }
}

/// The signature bytes are not a well-formed DER or fixed-width encoding
#[derive(Debug, Error)]
#[error("malformed signature encoding: {reason}")]
pub struct InvalidSignatureEncoding {
    reason: &'static str,
}

#[inline]
pub(crate) const fn invalid_signature_encoding(reason: &'static str) -> InvalidSignatureEncoding {
    InvalidSignatureEncoding { reason }
}

/// The segment is not valid unpadded base64url data
#[derive(Debug, Error)]
#[error("invalid base64url data")]
pub struct InvalidBase64 {
    #[from]
    source: base64::DecodeError,
}

/// The claim set could not be serialized or parsed as a JSON object
#[derive(Debug, Error)]
#[error("malformed claim set")]
pub struct MalformedClaims {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

#[inline]
pub(crate) fn malformed_claims(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedClaims {
    MalformedClaims {
        source: source.into(),
    }
}

/// The token string failed a structural check before signature verification
#[derive(Debug, Error)]
pub enum InvalidToken {
    /// The token is empty or does not have exactly three segments
    #[error("invalid token format")]
    Format,

    /// A token segment is not valid base64url data
    #[error("invalid token segment")]
    Encoding(#[from] InvalidBase64),

    /// The header segment is not a JSON object carrying an algorithm
    #[error("invalid token header")]
    Header,

    /// The header names an algorithm other than the one this verifier expects
    #[error("algorithm mismatch: expected '{expected}', got '{actual}'")]
    AlgorithmMismatch {
        /// The algorithm this verifier was configured with
        expected: String,
        /// The algorithm named by the token header
        actual: String,
    },

    /// The claims segment is not a JSON object
    #[error("invalid token payload")]
    Payload,
}

/// The signature is well-formed but does not validate against the key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("signature verification failed")]
pub struct SignatureInvalid {
    _p: (),
}

#[inline]
pub(crate) const fn signature_invalid() -> SignatureInvalid {
    SignatureInvalid { _p: () }
}

/// A temporal claim places the token outside its validity window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ExpiredToken {
    /// The `exp` claim lies in the past
    #[error("token expired")]
    Expired,

    /// The `nbf` claim lies in the future
    #[error("token not yet valid")]
    NotYetValid,
}

/// A token cannot be generated without an identity payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("an identity payload is required")]
pub struct MissingPayload {
    _p: (),
}

#[inline]
pub(crate) const fn missing_payload() -> MissingPayload {
    MissingPayload { _p: () }
}

/// Key material could not be generated
#[derive(Debug, Error)]
pub enum KeyGenerationError {
    /// The requested parameters are below the accepted minimums
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The underlying key-generation primitive failed
    #[error("key generation failed")]
    Failed(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

#[inline]
pub(crate) fn key_generation_failed(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> KeyGenerationError {
    KeyGenerationError::Failed(source.into())
}

/// An error occurring while a signer produces a signature
#[derive(Debug, Error)]
pub enum SignerError {
    /// The key failed the signer's format, type, or curve check
    #[error(transparent)]
    InvalidKey(#[from] InvalidKey),

    /// The cryptographic primitive failed
    #[error(transparent)]
    SigningFailure(#[from] SigningFailure),
}

/// An error occurring while generating a token
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No identity payload was supplied
    #[error(transparent)]
    MissingPayload(#[from] MissingPayload),

    /// A builder value was rejected
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The configured algorithm is not registered
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    /// The key is unusable with the configured algorithm
    #[error(transparent)]
    InvalidKey(#[from] InvalidKey),

    /// The signature could not be produced
    #[error(transparent)]
    SigningFailure(#[from] SigningFailure),

    /// The header or claim set could not be serialized
    #[error(transparent)]
    MalformedClaims(#[from] MalformedClaims),
}

impl From<SignerError> for GenerateError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::InvalidKey(e) => Self::InvalidKey(e),
            SignerError::SigningFailure(e) => Self::SigningFailure(e),
        }
    }
}

/// An error occurring while parsing and verifying a token
///
/// The boolean- and option-returning wrappers on
/// [`TokenManager`][crate::jwt::TokenManager] collapse every variant of this
/// error; only [`TokenManager::claims`][crate::jwt::TokenManager::claims]
/// surfaces it.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The token failed a structural check
    #[error(transparent)]
    InvalidToken(#[from] InvalidToken),

    /// The token names an algorithm that is not registered
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    /// The signature did not validate
    #[error(transparent)]
    SignatureInvalid(#[from] SignatureInvalid),

    /// A temporal claim was violated
    #[error(transparent)]
    Expired(#[from] ExpiredToken),
}

impl VerifyError {
    /// Whether the failure was structural
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Self::InvalidToken(_))
    }

    /// Whether the failure was a signature mismatch
    #[must_use]
    pub fn is_signature_invalid(&self) -> bool {
        matches!(self, Self::SignatureInvalid(_))
    }

    /// Whether the failure was a temporal claim violation
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}
