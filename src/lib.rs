//! Compact signed tokens: a claim set bound to a cryptographic
//! signature, carried as three base64url segments joined by dots
//! (the JWS compact serialization popularized by JWT).
//!
//! Supported algorithm families:
//!
//! * HMAC (`HS256`, `HS384`, `HS512`), keyed by a shared secret
//! * RSA PKCS#1 v1.5 (`RS256`, `RS384`, `RS512`), keyed by PEM key pairs
//! * ECDSA (`ES256`, `ES384`, `ES512`), keyed by PEM key pairs on the
//!   P-256, P-384, and P-521 curves, with token signatures in the
//!   fixed-width IEEE P1363 form
//!
//! Encryption (JWE), key distribution, and revocation are out of scope;
//! this crate only signs and verifies.
//!
//! # Example
//!
//! ```
//! use signet::{Identity, TokenManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::new("user123")?.with_claim("name", "John");
//!
//! let manager = TokenManager::new()
//!     .payload(identity)
//!     .algorithm("HS256")
//!     .ttl(3600);
//!
//! let token = manager.generate("secret")?;
//!
//! assert!(manager.verify(&token, "secret"));
//! assert!(!manager.verify(&token, "wrong-secret"));
//!
//! let info = manager.info(&token, "secret").expect("token is valid");
//! assert_eq!(info.id(), "user123");
//! # Ok(())
//! # }
//! ```
//!
//! Custom algorithms can be added by registering an implementation of
//! [`Signer`] with a [`SignerRegistry`]; the nine standard algorithms
//! come pre-registered in [`registry::default_registry()`].

#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod jwa;
pub mod jws;
pub mod jwt;
pub mod keygen;
pub mod registry;


#[doc(inline)]
pub use config::TokenConfig;
#[doc(inline)]
pub use identity::Identity;
#[doc(inline)]
pub use jwa::Algorithm;
#[doc(inline)]
pub use jws::Signer;
#[doc(inline)]
pub use jwt::TokenManager;
#[doc(inline)]
pub use registry::SignerRegistry;
