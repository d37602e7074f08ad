//! Cryptographic collaborators for hdkey.
//!
//! Thin wrappers over RustCrypto and dalek crates: the key tree only ever
//! sees byte arrays and the [`curve::CurveGroup`] trait.

#![forbid(unsafe_code)]

pub mod base58;
pub mod curve;
pub mod hash160;
pub mod hmac;
pub mod secret;

pub use secret::SecretBytes;
