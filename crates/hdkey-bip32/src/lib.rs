//! BIP32 key trees over secp256k1, P-256 and Ed25519.

#![forbid(unsafe_code)]

pub mod bip44;
pub mod extended;
mod family;
pub mod hdkey;
pub mod node;
pub mod path;

pub use extended::{ExtendedKeyRecord, KeyKind};
pub use family::{ED25519_PUBLIC_PREFIX, MASTER_HMAC_KEY};
pub use hdkey::{HdKey, PublicChild};
pub use hdkey_core::{CurveTag, Error, KeyFamilyKind, Result};
pub use node::HdNode;
pub use path::{DerivationPath, HARDENED};
