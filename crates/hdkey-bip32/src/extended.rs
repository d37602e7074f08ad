//! Serialized extended keys.
//!
//! Layout (78 bytes, then Base58Check):
//!
//! ```text
//! version(4) || depth(1) || parent_fingerprint(4) || child_index(4) || chain_code(32) || key(33)
//! ```
//!
//! All integers are big-endian. Private keys occupy the key field as
//! `0x00 || scalar`.

#![forbid(unsafe_code)]

use std::fmt;

use hdkey_core::{Error, KeyFamilyKind, Result};
use hdkey_crypto::base58;
use hdkey_crypto::SecretBytes;

/// Serialized extended key length before the checksum.
pub const EXTENDED_KEY_LEN: usize = 78;

/// `xprv`, shared by secp256k1 and P-256.
pub const WEIERSTRASS_PRIVATE_VERSION: u32 = 0x0488_ADE4;
/// `xpub`, shared by secp256k1 and P-256.
pub const WEIERSTRASS_PUBLIC_VERSION: u32 = 0x0488_B21E;
/// `eprv`
pub const ED25519_PRIVATE_VERSION: u32 = 0x0312_6F7C;
/// `epub`
pub const ED25519_PUBLIC_VERSION: u32 = 0x0312_73B8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Private,
    Public,
}

impl KeyKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Version bytes for a family and key kind.
pub const fn version(family: KeyFamilyKind, kind: KeyKind) -> u32 {
    match (family, kind) {
        (KeyFamilyKind::Weierstrass, KeyKind::Private) => WEIERSTRASS_PRIVATE_VERSION,
        (KeyFamilyKind::Weierstrass, KeyKind::Public) => WEIERSTRASS_PUBLIC_VERSION,
        (KeyFamilyKind::Edwards, KeyKind::Private) => ED25519_PRIVATE_VERSION,
        (KeyFamilyKind::Edwards, KeyKind::Public) => ED25519_PUBLIC_VERSION,
    }
}

/// Inverse of [`version`]. Unknown versions return None.
pub const fn classify(version: u32) -> Option<(KeyFamilyKind, KeyKind)> {
    match version {
        WEIERSTRASS_PRIVATE_VERSION => Some((KeyFamilyKind::Weierstrass, KeyKind::Private)),
        WEIERSTRASS_PUBLIC_VERSION => Some((KeyFamilyKind::Weierstrass, KeyKind::Public)),
        ED25519_PRIVATE_VERSION => Some((KeyFamilyKind::Edwards, KeyKind::Private)),
        ED25519_PUBLIC_VERSION => Some((KeyFamilyKind::Edwards, KeyKind::Public)),
        _ => None,
    }
}

/// Decoded fields of an extended key. No curve validation happens here.
#[derive(Clone)]
pub struct ExtendedKeyRecord {
    pub version: u32,
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_index: u32,
    pub chain_code: [u8; 32],
    pub key: SecretBytes<33>,
}

impl ExtendedKeyRecord {
    pub fn to_bytes(&self) -> SecretBytes<EXTENDED_KEY_LEN> {
        let mut out = SecretBytes::<EXTENDED_KEY_LEN>::zeroed();
        let b = out.as_mut_bytes();
        b[0..4].copy_from_slice(&self.version.to_be_bytes());
        b[4] = self.depth;
        b[5..9].copy_from_slice(&self.parent_fingerprint.to_be_bytes());
        b[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        b[13..45].copy_from_slice(&self.chain_code);
        b[45..78].copy_from_slice(self.key.as_bytes());
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(Error::InvalidExtendedKeyLength { got: data.len() });
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let key = SecretBytes::<33>::from_slice(&data[45..78])
            .ok_or(Error::InvalidExtendedKeyLength { got: data.len() })?;

        Ok(Self {
            version: read_u32(&data[0..4]),
            depth: data[4],
            parent_fingerprint: read_u32(&data[5..9]),
            child_index: read_u32(&data[9..13]),
            chain_code,
            key,
        })
    }

    /// Base58Check string.
    pub fn encode(&self) -> String {
        base58::encode_check(self.to_bytes().as_bytes())
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let data = base58::decode_check(encoded)?;
        Self::from_bytes(&data)
    }

    /// Version of an encoded key without parsing the rest.
    pub fn peek_version(encoded: &str) -> Result<u32> {
        let data = base58::decode_check(encoded)?;
        if data.len() < 4 {
            return Err(Error::InvalidExtendedKeyLength { got: data.len() });
        }
        Ok(read_u32(&data[0..4]))
    }

    pub fn classify(&self) -> Option<(KeyFamilyKind, KeyKind)> {
        classify(self.version)
    }

    pub fn expect_version(&self, expected: u32) -> Result<()> {
        if self.version != expected {
            return Err(Error::VersionMismatch {
                got: self.version,
                expected,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ExtendedKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ExtendedKeyRecord");
        s.field("version", &format_args!("{:#010x}", self.version))
            .field("depth", &self.depth)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .field("chain_code", &self.chain_code);
        match self.classify() {
            Some((_, KeyKind::Public)) => s.field("key", self.key.as_bytes()),
            _ => s.field("key", &self.key),
        };
        s.finish()
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}
