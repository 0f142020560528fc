//! Algorithm-to-signer resolution
//!
//! A [`SignerRegistry`] maps algorithm identifiers to shared
//! [`Signer`] instances. A process-wide default registry comes
//! pre-populated with the nine standard algorithms; independent
//! instances can be built for tests or for custom algorithm sets and
//! injected into a [`TokenManager`][crate::jwt::TokenManager].
//!
//! Registries are safe to share across threads: lookups and mutations
//! go through a reader/writer lock, so no caller ever observes a
//! partially-updated entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::error::{self, UnsupportedAlgorithm};
use crate::jwa::{Algorithm, EcdsaSigner, HmacSigner, RsaSigner};
use crate::jws::Signer;

static DEFAULT_REGISTRY: Lazy<SignerRegistry> =
    Lazy::new(SignerRegistry::with_standard_algorithms);

/// The process-wide registry, pre-populated with the nine standard
/// algorithms
pub fn default_registry() -> &'static SignerRegistry {
    &DEFAULT_REGISTRY
}

/// A concurrent map from algorithm identifiers to signers
#[must_use]
pub struct SignerRegistry {
    signers: RwLock<HashMap<String, Arc<dyn Signer>>>,
}

impl SignerRegistry {
    /// A registry with no algorithms registered
    pub fn empty() -> Self {
        Self {
            signers: RwLock::new(HashMap::new()),
        }
    }

    /// A registry populated with the nine standard algorithms
    pub fn with_standard_algorithms() -> Self {
        let registry = Self::empty();

        for alg in Algorithm::STANDARD {
            let signer: Arc<dyn Signer> = match alg {
                Algorithm::Hmac(alg) => Arc::new(HmacSigner::new(alg)),
                Algorithm::Rsa(alg) => Arc::new(RsaSigner::new(alg)),
                Algorithm::EllipticCurve(alg) => Arc::new(EcdsaSigner::new(alg)),
            };
            registry.register(alg.as_str(), signer);
        }

        registry
    }

    /// Resolves the signer registered for an algorithm identifier
    ///
    /// # Errors
    ///
    /// Returns an error naming every currently registered identifier if
    /// the algorithm is unknown.
    pub fn create(&self, algorithm: &str) -> Result<Arc<dyn Signer>, UnsupportedAlgorithm> {
        let signers = self.signers.read().expect("signer registry lock poisoned");

        signers.get(algorithm).cloned().ok_or_else(|| {
            let mut supported: Vec<String> = signers.keys().cloned().collect();
            supported.sort_unstable();
            error::unsupported_algorithm(algorithm, supported)
        })
    }

    /// Whether an algorithm identifier is registered
    #[must_use]
    pub fn is_supported(&self, algorithm: &str) -> bool {
        self.signers
            .read()
            .expect("signer registry lock poisoned")
            .contains_key(algorithm)
    }

    /// Registers a signer under an algorithm identifier, replacing any
    /// existing registration
    pub fn register(&self, algorithm: impl Into<String>, signer: Arc<dyn Signer>) {
        self.signers
            .write()
            .expect("signer registry lock poisoned")
            .insert(algorithm.into(), signer);
    }

    /// Removes a registration, reporting whether one was present
    pub fn unregister(&self, algorithm: &str) -> bool {
        self.signers
            .write()
            .expect("signer registry lock poisoned")
            .remove(algorithm)
            .is_some()
    }

    /// The registered algorithm identifiers, sorted
    #[must_use]
    pub fn supported_algorithms(&self) -> Vec<String> {
        let mut supported: Vec<String> = self
            .signers
            .read()
            .expect("signer registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        supported.sort_unstable();
        supported
    }
}

impl fmt::Debug for SignerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SignerRegistry")
            .field("algorithms", &self.supported_algorithms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SignerError;
    use crate::jwa::{ec, hmac, rsa};

    use super::*;

    #[derive(Debug)]
    struct UpperCaseSigner;

    impl Signer for UpperCaseSigner {
        fn algorithm(&self) -> &str {
            "UC1"
        }

        fn is_valid_key(&self, key: &str) -> bool {
            !key.is_empty()
        }

        fn sign(&self, signing_input: &[u8], _key: &str) -> Result<Vec<u8>, SignerError> {
            Ok(signing_input.to_ascii_uppercase())
        }

        fn verify(&self, signing_input: &[u8], signature: &[u8], key: &str) -> bool {
            self.sign(signing_input, key)
                .map(|expected| expected == signature)
                .unwrap_or(false)
        }
    }

    #[test]
    fn default_registry_knows_the_standard_algorithms() {
        let registry = default_registry();
        for alg in Algorithm::STANDARD {
            assert!(registry.is_supported(alg.as_str()));
            assert_eq!(registry.create(alg.as_str()).unwrap().algorithm(), alg.as_str());
        }
        assert!(!registry.is_supported("none"));
    }

    #[test]
    fn unknown_algorithms_report_the_supported_set() {
        let registry = SignerRegistry::with_standard_algorithms();
        let err = registry.create("XX999").unwrap_err();
        assert_eq!(err.algorithm(), "XX999");
        assert_eq!(err.supported().len(), 9);
        assert!(err.to_string().contains("ES256"));
    }

    #[test]
    fn custom_registration_leaves_standard_algorithms_intact() {
        let registry = SignerRegistry::with_standard_algorithms();
        registry.register("UC1", Arc::new(UpperCaseSigner));

        assert!(registry.is_supported("UC1"));
        let signer = registry.create("UC1").unwrap();
        assert_eq!(signer.sign(b"abc", "k").unwrap(), b"ABC");

        let hs256 = registry.create("HS256").unwrap();
        let signature = hs256.sign(b"abc", "k").unwrap();
        assert_eq!(signature.len(), hmac::SigningAlgorithm::HS256.signature_size());
    }

    #[test]
    fn unregistering_removes_resolution() {
        let registry = SignerRegistry::with_standard_algorithms();
        assert!(registry.unregister("HS256"));
        assert!(!registry.unregister("HS256"));
        assert!(!registry.is_supported("HS256"));
        assert!(registry.create("HS256").is_err());

        // the remaining standard algorithms are untouched
        assert!(registry.is_supported("HS384"));
        assert_eq!(registry.supported_algorithms().len(), 8);
    }

    #[test]
    fn concurrent_readers_and_writers_do_not_interfere() {
        let registry = Arc::new(SignerRegistry::with_standard_algorithms());

        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for i in 0..100 {
                    registry.register(format!("X{i}"), Arc::new(UpperCaseSigner));
                    registry.unregister(&format!("X{i}"));
                }
            })
        };

        let reader = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    assert!(registry.create("HS256").is_ok());
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
    }

    #[test]
    fn family_signers_are_registered_for_each_strength() {
        let registry = SignerRegistry::with_standard_algorithms();
        for (alg, expected) in [
            ("RS384", rsa::SigningAlgorithm::RS384.as_str()),
            ("ES512", ec::SigningAlgorithm::ES512.as_str()),
        ] {
            assert_eq!(registry.create(alg).unwrap().algorithm(), expected);
        }
    }
}
