//! The token engine
//!
//! A token is three unpadded base64url segments joined by `.`:
//!
//! ```text
//! eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.eyJpZCI6InVzZXIxMjMifQ.Fd0w…
//! ```
//!
//! The first two segments carry the JSON header and claim set; joined by
//! a `.` they form the *signing input*, the exact byte string that is
//! signed. The third segment is the signature over that input.
//!
//! [`TokenManager`] drives both directions: [`generate()`][TokenManager::generate]
//! assembles and signs a token for an [`Identity`], while
//! [`verify()`][TokenManager::verify], [`info()`][TokenManager::info], and
//! [`claims()`][TokenManager::claims] parse a token back, re-verify its
//! signature, and enforce the temporal claims.
//!
//! ```
//! use signet::{Identity, TokenManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::new("user123")?.with_claim("name", "John");
//! let manager = TokenManager::new().payload(identity);
//!
//! let token = manager.generate("secret")?;
//! assert!(manager.verify(&token, "secret"));
//!
//! let info = manager.info(&token, "secret").expect("token is valid");
//! assert_eq!(info.id(), "user123");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::{Clock, System};
use crate::codec;
use crate::config::{TokenConfig, DEFAULT_TTL};
use crate::error::{self, ExpiredToken, GenerateError, InvalidToken, VerifyError};
use crate::identity::Identity;
use crate::registry::{default_registry, SignerRegistry};

/// The algorithm assumed when neither the builder nor the config names
/// one
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// Claims the engine manages itself; they are stripped from an
/// [`Identity`] reconstructed by [`TokenManager::info`]
const RESERVED_CLAIMS: [&str; 6] = ["iss", "aud", "exp", "nbf", "iat", "jti"];

/// A token header
///
/// Serialized as `{"typ":"JWT","alg":"<id>"}`. On parse, unknown fields
/// are ignored and a missing `typ` is tolerated; a missing `alg` is a
/// malformed header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Header {
    #[serde(default = "Header::default_typ")]
    typ: String,
    alg: String,
}

impl Header {
    /// Constructs a header naming the signing algorithm
    pub fn new(alg: impl Into<String>) -> Self {
        Self {
            typ: Self::default_typ(),
            alg: alg.into(),
        }
    }

    fn default_typ() -> String {
        "JWT".to_owned()
    }

    /// The token type, `"JWT"`
    #[must_use]
    pub fn typ(&self) -> &str {
        &self.typ
    }

    /// The algorithm identifier
    #[must_use]
    pub fn alg(&self) -> &str {
        &self.alg
    }
}

/// Issues and verifies signed tokens
///
/// A manager is a fluent builder over the issuance/verification
/// settings: the identity payload, the algorithm, the TTL, and the
/// optional issuer and audience claims. The same instance serves both
/// directions; verification is pinned to the manager's configured
/// algorithm, so a token whose header names any other algorithm is
/// rejected outright.
///
/// Every operation takes the key material per call. Passing `None`
/// falls back to the configured `secret_key`, if any.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct TokenManager {
    identity: Option<Identity>,
    algorithm: Option<String>,
    ttl: Option<u64>,
    issuer: Option<String>,
    audience: Option<String>,
    config: TokenConfig,
    registry: Option<Arc<SignerRegistry>>,
}

impl TokenManager {
    /// A manager with no payload and all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity payload
    pub fn payload(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the signing algorithm, which is also the only algorithm
    /// verification will accept
    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Sets the time-to-live in seconds used to stamp the `exp` claim
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    /// Sets the `iss` claim stamped on generated tokens
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the `aud` claim stamped on generated tokens
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Supplies fallback settings consulted where no explicit value was
    /// set
    pub fn with_config(mut self, config: TokenConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves algorithms through the given registry instead of the
    /// process-wide default
    pub fn with_registry(mut self, registry: Arc<SignerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    fn signer_registry(&self) -> &SignerRegistry {
        self.registry.as_deref().unwrap_or_else(|| default_registry())
    }

    fn resolved_algorithm(&self) -> &str {
        self.algorithm
            .as_deref()
            .or(self.config.algorithm.as_deref())
            .unwrap_or(DEFAULT_ALGORITHM)
    }

    /// Generates a signed token for the configured payload
    ///
    /// # Errors
    ///
    /// * [`GenerateError::MissingPayload`] if no identity was set
    /// * [`GenerateError::InvalidArgument`] if the effective TTL is zero
    /// * [`GenerateError::UnsupportedAlgorithm`] if the algorithm is not
    ///   registered
    /// * [`GenerateError::InvalidKey`] if the key is missing or unusable
    ///   with the algorithm
    /// * [`GenerateError::SigningFailure`] if the cryptographic
    ///   primitive fails
    pub fn generate<'a>(&self, key: impl Into<Option<&'a str>>) -> Result<String, GenerateError> {
        self.generate_with_clock(key, &System)
    }

    /// Generates a signed token, reading the issue time from the given
    /// clock
    ///
    /// # Errors
    ///
    /// As for [`generate()`][Self::generate].
    pub fn generate_with_clock<'a>(
        &self,
        key: impl Into<Option<&'a str>>,
        clock: &impl Clock,
    ) -> Result<String, GenerateError> {
        let identity = self.identity.as_ref().ok_or_else(error::missing_payload)?;

        let ttl = self.ttl.or(self.config.ttl).unwrap_or(DEFAULT_TTL);
        if ttl == 0 {
            return Err(error::invalid_argument("token TTL must be greater than zero").into());
        }

        let mut claims = identity.to_claims();
        claims.insert("exp".to_owned(), Value::from(clock.now().0 + ttl));

        if let Some(issuer) = self.issuer.as_deref().or(self.config.issuer.as_deref()) {
            claims.insert("iss".to_owned(), Value::from(issuer));
        }

        if let Some(audience) = self.audience.as_deref().or(self.config.audience.as_deref()) {
            claims.insert("aud".to_owned(), Value::from(audience));
        }

        let alg = self.resolved_algorithm();
        let signer = self.signer_registry().create(alg)?;

        let key = key
            .into()
            .or(self.config.secret_key.as_deref())
            .ok_or_else(|| error::invalid_key(alg))?;
        if !signer.is_valid_key(key) {
            return Err(error::invalid_key(alg).into());
        }

        let header_json = serde_json::to_vec(&Header::new(alg)).map_err(error::malformed_claims)?;
        let claims_json = codec::serialize_claims(&claims)?;

        let mut token = codec::base64url_encode(header_json);
        token.push('.');
        token.push_str(&codec::base64url_encode(claims_json));

        let signature = signer.sign(token.as_bytes(), key)?;

        token.push('.');
        token.push_str(&codec::base64url_encode(signature));

        Ok(token)
    }

    /// Whether the token is structurally valid, carries a valid
    /// signature under the key, and is within its validity window
    ///
    /// Every failure collapses to `false`; no detail about why a token
    /// was rejected escapes to the caller.
    #[must_use]
    pub fn verify<'a>(&self, token: &str, key: impl Into<Option<&'a str>>) -> bool {
        match self.claims(token, key) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "token rejected");
                false
            }
        }
    }

    /// Extracts the identity from a valid token
    ///
    /// Returns `None` for any invalid token and for valid tokens whose
    /// claims lack a usable `id`, without revealing which. The engine's
    /// reserved claims are stripped, so the identity round-trips exactly
    /// as it was supplied to [`generate()`][Self::generate].
    #[must_use]
    pub fn info<'a>(&self, token: &str, key: impl Into<Option<&'a str>>) -> Option<Identity> {
        let mut claims = match self.claims(token, key) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "token rejected");
                return None;
            }
        };

        for reserved in RESERVED_CLAIMS {
            claims.remove(reserved);
        }

        match Identity::from_claims(claims) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::debug!(error = %err, "verified token carries no usable identity");
                None
            }
        }
    }

    /// Parses and verifies a token, returning its full claim set
    ///
    /// This is the failure-reporting primitive underneath
    /// [`verify()`][Self::verify] and [`info()`][Self::info]; use it
    /// when the caller needs the reason a token was rejected, or claims
    /// like `exp` that [`info()`][Self::info] strips.
    ///
    /// # Errors
    ///
    /// Returns a [`VerifyError`] naming the first check that failed.
    pub fn claims<'a>(
        &self,
        token: &str,
        key: impl Into<Option<&'a str>>,
    ) -> Result<Map<String, Value>, VerifyError> {
        self.claims_with_clock(token, key, &System)
    }

    /// Parses and verifies a token, evaluating temporal claims against
    /// the given clock
    ///
    /// # Errors
    ///
    /// As for [`claims()`][Self::claims].
    pub fn claims_with_clock<'a>(
        &self,
        token: &str,
        key: impl Into<Option<&'a str>>,
        clock: &impl Clock,
    ) -> Result<Map<String, Value>, VerifyError> {
        let key = key.into().or(self.config.secret_key.as_deref());
        self.parse_and_verify(token, key, clock.now())
    }

    fn parse_and_verify(
        &self,
        token: &str,
        key: Option<&str>,
        now: crate::clock::UnixTime,
    ) -> Result<Map<String, Value>, VerifyError> {
        if token.is_empty() {
            return Err(InvalidToken::Format.into());
        }

        let mut segments = token.split('.');
        let (header_b64, claims_b64, signature_b64) = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(header), Some(claims), Some(signature), None) => (header, claims, signature),
            _ => return Err(InvalidToken::Format.into()),
        };

        let header_raw = codec::base64url_decode(header_b64).map_err(InvalidToken::from)?;
        let claims_raw = codec::base64url_decode(claims_b64).map_err(InvalidToken::from)?;

        let header: Header =
            serde_json::from_slice(&header_raw).map_err(|_| InvalidToken::Header)?;

        let expected = self.resolved_algorithm();
        if header.alg != expected {
            return Err(InvalidToken::AlgorithmMismatch {
                expected: expected.to_owned(),
                actual: header.alg,
            }
            .into());
        }

        let claims = codec::parse_claims(&claims_raw).map_err(|_| InvalidToken::Payload)?;

        let signer = self.signer_registry().create(expected)?;
        let signature = codec::base64url_decode(signature_b64).map_err(InvalidToken::from)?;
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];

        let signature_ok = key
            .map(|key| signer.verify(signing_input.as_bytes(), &signature, key))
            .unwrap_or(false);
        if !signature_ok {
            return Err(error::signature_invalid().into());
        }

        let now = now.0 as i64;
        if let Some(exp) = claims.get("exp").and_then(Value::as_i64) {
            if exp < now {
                return Err(ExpiredToken::Expired.into());
            }
        }

        if let Some(nbf) = claims.get("nbf").and_then(Value::as_i64) {
            if nbf > now {
                return Err(ExpiredToken::NotYetValid.into());
            }
        }

        Ok(claims)
    }
}
