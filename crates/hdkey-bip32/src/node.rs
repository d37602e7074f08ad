//! Node state shared by every key in a tree.

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::OnceLock;

use hdkey_core::CurveTag;
use hdkey_crypto::SecretBytes;

use crate::family::family;

/// Key material held by a node.
#[derive(Clone)]
enum KeyMaterial {
    /// Private scalar plus its public key, computed on first use.
    Private {
        key: SecretBytes<32>,
        public_key: OnceLock<[u8; 33]>,
    },
    Public([u8; 33]),
}

/// One position in a key tree.
///
/// Immutable once built. The public key is computed from the private key on
/// first use and cached; public-only nodes carry it from construction.
#[derive(Clone)]
pub struct HdNode {
    curve: CurveTag,
    depth: u8,
    child_index: u32,
    chain_code: [u8; 32],
    keys: KeyMaterial,
}

impl HdNode {
    /// `private_key` must already be validated for `curve`.
    pub(crate) fn with_private_key(
        curve: CurveTag,
        depth: u8,
        child_index: u32,
        chain_code: [u8; 32],
        private_key: SecretBytes<32>,
    ) -> Self {
        Self {
            curve,
            depth,
            child_index,
            chain_code,
            keys: KeyMaterial::Private {
                key: private_key,
                public_key: OnceLock::new(),
            },
        }
    }

    /// `public_key` must already be validated for `curve`.
    pub(crate) fn with_public_key(
        curve: CurveTag,
        depth: u8,
        child_index: u32,
        chain_code: [u8; 32],
        public_key: [u8; 33],
    ) -> Self {
        Self {
            curve,
            depth,
            child_index,
            chain_code,
            keys: KeyMaterial::Public(public_key),
        }
    }

    pub fn curve(&self) -> CurveTag {
        self.curve
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn private_key(&self) -> Option<&SecretBytes<32>> {
        match &self.keys {
            KeyMaterial::Private { key, .. } => Some(key),
            KeyMaterial::Public(_) => None,
        }
    }

    pub fn has_private_key(&self) -> bool {
        matches!(self.keys, KeyMaterial::Private { .. })
    }

    /// 33-byte public key slot.
    ///
    /// # Panics
    ///
    /// If a stored private key is not a valid scalar for the node's curve.
    /// Every constructor path validates the key first.
    pub fn public_key(&self) -> [u8; 33] {
        match &self.keys {
            KeyMaterial::Private { key, public_key } => *public_key.get_or_init(|| {
                family(self.curve)
                    .encode_point(key)
                    .expect("private keys are validated before a node is built")
            }),
            KeyMaterial::Public(public_key) => *public_key,
        }
    }

    /// Public key if already known, without computing it.
    fn cached_public_key(&self) -> Option<&[u8; 33]> {
        match &self.keys {
            KeyMaterial::Private { public_key, .. } => public_key.get(),
            KeyMaterial::Public(public_key) => Some(public_key),
        }
    }

    /// Copy of this node without the private key.
    pub(crate) fn neutered(&self) -> Self {
        Self::with_public_key(
            self.curve,
            self.depth,
            self.child_index,
            self.chain_code,
            self.public_key(),
        )
    }
}

impl fmt::Debug for HdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdNode")
            .field("curve", &self.curve)
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("chain_code", &self.chain_code)
            .field("private_key", &self.private_key())
            .field("public_key", &self.cached_public_key())
            .finish()
    }
}
