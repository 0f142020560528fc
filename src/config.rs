//! Default settings for token issuance and verification
//!
//! A [`TokenConfig`] supplies fallbacks the
//! [`TokenManager`][crate::jwt::TokenManager] consults when no explicit
//! value was set on the builder. It is never required for correctness:
//! an absent config simply means the built-in defaults apply.

use std::fmt;

use serde::Deserialize;

/// The time-to-live applied when neither the builder nor the config
/// names one, in seconds
pub const DEFAULT_TTL: u64 = 3600;

/// Fallback settings for a token manager
///
/// Typically deserialized from an application's configuration file.
/// Explicit builder values always win over these; the secret key is
/// only consulted when no key is passed to the operation itself.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
#[must_use]
pub struct TokenConfig {
    /// Default signing algorithm identifier
    pub algorithm: Option<String>,

    /// Default key material
    pub secret_key: Option<String>,

    /// Default time-to-live in seconds
    pub ttl: Option<u64>,

    /// Default `iss` claim
    pub issuer: Option<String>,

    /// Default `aud` claim
    pub audience: Option<String>,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("algorithm", &self.algorithm)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}
