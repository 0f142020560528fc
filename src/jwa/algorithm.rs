use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::jwa;

/// A token signing algorithm
///
/// The nine standard algorithms are first-class members of this
/// enumeration; the signer registry additionally accepts arbitrary
/// algorithm identifiers for custom signers.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum Algorithm {
    /// HMAC symmetric
    Hmac(jwa::hmac::SigningAlgorithm),

    /// RSA public/private key pair (PKCS#1 v1.5)
    Rsa(jwa::rsa::SigningAlgorithm),

    /// Elliptic curve cryptography
    EllipticCurve(jwa::ec::SigningAlgorithm),
}

impl Algorithm {
    /// The HS256 signing algorithm
    pub const HS256: Algorithm = Self::Hmac(jwa::hmac::SigningAlgorithm::HS256);
    /// The HS384 signing algorithm
    pub const HS384: Algorithm = Self::Hmac(jwa::hmac::SigningAlgorithm::HS384);
    /// The HS512 signing algorithm
    pub const HS512: Algorithm = Self::Hmac(jwa::hmac::SigningAlgorithm::HS512);
    /// The RS256 signing algorithm
    pub const RS256: Algorithm = Self::Rsa(jwa::rsa::SigningAlgorithm::RS256);
    /// The RS384 signing algorithm
    pub const RS384: Algorithm = Self::Rsa(jwa::rsa::SigningAlgorithm::RS384);
    /// The RS512 signing algorithm
    pub const RS512: Algorithm = Self::Rsa(jwa::rsa::SigningAlgorithm::RS512);
    /// The ES256 signing algorithm
    pub const ES256: Algorithm = Self::EllipticCurve(jwa::ec::SigningAlgorithm::ES256);
    /// The ES384 signing algorithm
    pub const ES384: Algorithm = Self::EllipticCurve(jwa::ec::SigningAlgorithm::ES384);
    /// The ES512 signing algorithm
    pub const ES512: Algorithm = Self::EllipticCurve(jwa::ec::SigningAlgorithm::ES512);

    /// All nine standard algorithms
    pub const STANDARD: [Algorithm; 9] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    /// The algorithm identifier as it appears in a token header
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hmac(alg) => alg.as_str(),
            Self::Rsa(alg) => alg.as_str(),
            Self::EllipticCurve(alg) => alg.as_str(),
        }
    }
}

/// The provided name could not be matched with a standard algorithm
#[derive(Debug, Error)]
#[error("'{alg}' does not match a standard algorithm")]
pub struct UnknownAlgorithm {
    alg: String,
}

impl TryFrom<&'_ str> for Algorithm {
    type Error = UnknownAlgorithm;

    fn try_from(value: &'_ str) -> Result<Self, Self::Error> {
        match value {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            "RS256" => Ok(Algorithm::RS256),
            "RS384" => Ok(Algorithm::RS384),
            "RS512" => Ok(Algorithm::RS512),
            "ES256" => Ok(Algorithm::ES256),
            "ES384" => Ok(Algorithm::ES384),
            "ES512" => Ok(Algorithm::ES512),
            _ => Err(UnknownAlgorithm {
                alg: value.to_string(),
            }),
        }
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Algorithm> for String {
    fn from(alg: Algorithm) -> Self {
        alg.as_str().to_owned()
    }
}

impl From<jwa::hmac::SigningAlgorithm> for Algorithm {
    fn from(alg: jwa::hmac::SigningAlgorithm) -> Self {
        Self::Hmac(alg)
    }
}

impl From<jwa::rsa::SigningAlgorithm> for Algorithm {
    fn from(alg: jwa::rsa::SigningAlgorithm) -> Self {
        Self::Rsa(alg)
    }
}

impl From<jwa::ec::SigningAlgorithm> for Algorithm {
    fn from(alg: jwa::ec::SigningAlgorithm) -> Self {
        Self::EllipticCurve(alg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for alg in Algorithm::STANDARD {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("none".parse::<Algorithm>().is_err());
        assert!("hs256".parse::<Algorithm>().is_err());
    }
}
