//! Signing algorithm families and their signers
//!
//! Each family module carries its own `SigningAlgorithm` enum naming the
//! hash strengths it supports, alongside the [`Signer`][crate::jws::Signer]
//! implementation for that family.

pub mod ec;
pub mod hmac;
pub mod rsa;

#[doc(inline)]
pub use ec::EcdsaSigner;
#[doc(inline)]
pub use hmac::HmacSigner;
#[doc(inline)]
pub use rsa::RsaSigner;

mod algorithm;

pub use algorithm::{Algorithm, UnknownAlgorithm};
