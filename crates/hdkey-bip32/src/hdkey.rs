//! Curve-polymorphic HD key.
//!
//! [`HdKey`] owns one [`HdNode`] plus the fingerprint of its parent and
//! forwards every curve-specific step to the family engine picked from the
//! node's [`CurveTag`].
//!
//! ```
//! use hdkey_bip32::{CurveTag, HdKey};
//!
//! let seed = [0x42u8; 32];
//! let root = HdKey::from_seed(CurveTag::Secp256k1, &seed).unwrap();
//! let account = root.private_ckd_path("m/44'/0'/0'").unwrap();
//!
//! let watch = account.neuter();
//! let child = watch.public_ckd_path("m/0/5").unwrap();
//! let spend = account.private_ckd_path("m/0/5").unwrap();
//! assert_eq!(child.key.public_key(), spend.public_key());
//! ```

#![forbid(unsafe_code)]

use hdkey_core::{CurveTag, Error, Result};
use hdkey_crypto::hash160::{fingerprint, hash160};
use hdkey_crypto::SecretBytes;
use tracing::trace;

use crate::extended::{version, ExtendedKeyRecord, KeyKind};
use crate::family::family;
use crate::node::HdNode;
use crate::path::{is_hardened, DerivationPath};

/// A node in an HD key tree.
#[derive(Clone, Debug)]
pub struct HdKey {
    node: HdNode,
    parent_fingerprint: u32,
}

/// Output of public derivation.
#[derive(Clone, Debug)]
pub struct PublicChild {
    /// Public-only child key.
    pub key: HdKey,
    /// Sum of the per-step offsets, mod the group order, in the curve's
    /// native byte order. `parent_pub + delta*G == key.public_key()`.
    pub delta: [u8; 32],
}

impl HdKey {
    /// Master key from seed bytes.
    ///
    /// Fails with [`Error::InvalidSeed`] if the HMAC output is not a usable
    /// scalar for `curve`.
    pub fn from_seed(curve: CurveTag, seed: &[u8]) -> Result<Self> {
        let (private_key, chain_code) = family(curve).seed_to_master(seed)?;
        Ok(Self {
            node: HdNode::with_private_key(curve, 0, 0, chain_code, private_key),
            parent_fingerprint: 0,
        })
    }

    /// Key from a raw 32-byte scalar in the curve's native byte order.
    pub fn from_private_key(
        curve: CurveTag,
        private_key: &[u8],
        chain_code: [u8; 32],
        depth: u8,
        child_index: u32,
        parent_fingerprint: u32,
    ) -> Result<Self> {
        let private_key = family(curve).decode_scalar(private_key)?;
        Ok(Self {
            node: HdNode::with_private_key(curve, depth, child_index, chain_code, private_key),
            parent_fingerprint,
        })
    }

    /// Public-only key from a point encoding.
    ///
    /// Weierstrass curves accept SEC1 compressed or uncompressed points;
    /// Ed25519 accepts the raw 32-byte encoding or the 33-byte key slot.
    pub fn from_public_key(
        curve: CurveTag,
        public_key: &[u8],
        chain_code: [u8; 32],
        depth: u8,
        child_index: u32,
        parent_fingerprint: u32,
    ) -> Result<Self> {
        let public_key = family(curve).decode_point(public_key)?;
        Ok(Self {
            node: HdNode::with_public_key(curve, depth, child_index, chain_code, public_key),
            parent_fingerprint,
        })
    }

    /// Derive one child from the private key.
    ///
    /// Indices at or above [`HARDENED`](crate::HARDENED) use hardened
    /// derivation. If the candidate for `index` is invalid the next index is
    /// tried, so the child's [`child_index`](Self::child_index) may be larger.
    pub fn private_ckd(&self, index: u32) -> Result<Self> {
        let private_key = self.node.private_key().ok_or(Error::MissingPrivateKey)?;
        let depth = self.child_depth()?;
        let parent_public = self.public_key();

        let step =
            family(self.curve()).derive_private(private_key, &parent_public, self.chain_code(), index)?;

        Ok(Self {
            node: HdNode::with_private_key(
                self.curve(),
                depth,
                step.index,
                step.chain_code,
                step.scalar,
            ),
            parent_fingerprint: fingerprint(&parent_public),
        })
    }

    /// Derive one public child. Hardened indices are rejected.
    pub fn public_ckd(&self, index: u32) -> Result<PublicChild> {
        if is_hardened(index) {
            return Err(Error::HardenedPublicDerivation { index });
        }
        let depth = self.child_depth()?;
        let parent_public = self.public_key();

        let step = family(self.curve()).derive_public(&parent_public, self.chain_code(), index)?;

        Ok(PublicChild {
            key: Self {
                node: HdNode::with_public_key(
                    self.curve(),
                    depth,
                    step.index,
                    step.chain_code,
                    step.public_key,
                ),
                parent_fingerprint: fingerprint(&parent_public),
            },
            delta: step.delta,
        })
    }

    /// Parse `path` and derive privately along it.
    pub fn private_ckd_path(&self, path: &str) -> Result<Self> {
        self.derive_path(&path.parse()?)
    }

    /// Parse `path` and derive publicly along it.
    pub fn public_ckd_path(&self, path: &str) -> Result<PublicChild> {
        self.derive_public_path(&path.parse()?)
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut key = self.clone();
        for &index in path {
            trace!(curve = %self.curve(), depth = key.depth(), index, "private derivation step");
            key = key.private_ckd(index)?;
        }
        Ok(key)
    }

    /// Public derivation along `path`, accumulating the per-step deltas.
    ///
    /// The whole path is checked for hardened segments before any work.
    pub fn derive_public_path(&self, path: &DerivationPath) -> Result<PublicChild> {
        if let Some(&index) = path.iter().find(|&&index| is_hardened(index)) {
            return Err(Error::HardenedPublicDerivation { index });
        }

        let engine = family(self.curve());
        let mut key = self.neuter();
        let mut delta = [0u8; 32];
        for &index in path {
            trace!(curve = %self.curve(), depth = key.depth(), index, "public derivation step");
            let child = key.public_ckd(index)?;
            delta = engine.add_deltas(&delta, &child.delta)?;
            key = child.key;
        }
        Ok(PublicChild { key, delta })
    }

    /// Base58Check `xprv`/`eprv` string.
    pub fn to_extended_private_key(&self) -> Result<String> {
        let private_key = self.node.private_key().ok_or(Error::MissingPrivateKey)?;
        let mut key = SecretBytes::<33>::zeroed();
        key.as_mut_bytes()[1..].copy_from_slice(private_key.as_bytes());
        Ok(self.record(KeyKind::Private, key).encode())
    }

    /// Base58Check `xpub`/`epub` string.
    pub fn to_extended_public_key(&self) -> String {
        self.record(KeyKind::Public, SecretBytes::new(self.public_key()))
            .encode()
    }

    pub fn from_extended_private_key(curve: CurveTag, encoded: &str) -> Result<Self> {
        let record = ExtendedKeyRecord::decode(encoded)?;
        record.expect_version(version(curve.family(), KeyKind::Private))?;

        let key = record.key.as_bytes();
        if key[0] != 0x00 {
            return Err(Error::InvalidKey(format!(
                "private key field must start with 0x00, got {:#04x}",
                key[0]
            )));
        }

        Self::from_private_key(
            curve,
            &key[1..],
            record.chain_code,
            record.depth,
            record.child_index,
            record.parent_fingerprint,
        )
    }

    pub fn from_extended_public_key(curve: CurveTag, encoded: &str) -> Result<Self> {
        let record = ExtendedKeyRecord::decode(encoded)?;
        record.expect_version(version(curve.family(), KeyKind::Public))?;

        Self::from_public_key(
            curve,
            record.key.as_bytes(),
            record.chain_code,
            record.depth,
            record.child_index,
            record.parent_fingerprint,
        )
    }

    /// Public-only copy of this key.
    pub fn neuter(&self) -> Self {
        Self {
            node: self.node.neutered(),
            parent_fingerprint: self.parent_fingerprint,
        }
    }

    /// `public_key + delta*G`, with `delta` as returned by public derivation.
    pub fn offset_public_key(&self, delta: &[u8; 32]) -> Result<[u8; 33]> {
        family(self.curve()).offset_point(&self.public_key(), delta)
    }

    pub fn node(&self) -> &HdNode {
        &self.node
    }

    pub fn curve(&self) -> CurveTag {
        self.node.curve()
    }

    pub fn depth(&self) -> u8 {
        self.node.depth()
    }

    pub fn child_index(&self) -> u32 {
        self.node.child_index()
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        self.node.chain_code()
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    pub fn has_private_key(&self) -> bool {
        self.node.has_private_key()
    }

    pub fn private_key(&self) -> Option<&SecretBytes<32>> {
        self.node.private_key()
    }

    pub fn public_key(&self) -> [u8; 33] {
        self.node.public_key()
    }

    /// HASH160 of the public key slot.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key())
    }

    /// Fingerprint children of this key record as their parent fingerprint.
    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.public_key())
    }

    fn child_depth(&self) -> Result<u8> {
        self.depth().checked_add(1).ok_or(Error::DepthOverflow)
    }

    fn record(&self, kind: KeyKind, key: SecretBytes<33>) -> ExtendedKeyRecord {
        ExtendedKeyRecord {
            version: version(self.curve().family(), kind),
            depth: self.depth(),
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index(),
            chain_code: *self.chain_code(),
            key,
        }
    }
}
