//! BIP32-style derivation over Edwards25519.
//!
//! Same HMAC chain as the Weierstrass engine with three differences: scalars
//! are little-endian, IL is reduced modulo l instead of range-checked, and
//! non-hardened messages carry a `0x01` lead byte in front of the raw 32-byte
//! point encoding.

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};
use hdkey_crypto::curve::{CurveGroup, Ed25519};
use hdkey_crypto::hmac::hmac_sha512;
use hdkey_crypto::SecretBytes;
use tracing::debug;
use zeroize::Zeroizing;

use super::{
    add_deltas, decode_point, decode_scalar, encode_point, hardened_message, load_point,
    load_scalar, next_index, normal_message, offset_point, KeyFamily, PrivateStep, PublicStep,
    MASTER_HMAC_KEY,
};
use crate::path::is_hardened;

/// Lead byte of non-hardened Ed25519 derivation messages.
pub const ED25519_PUBLIC_PREFIX: u8 = 0x01;

pub(crate) struct EddsaFamily;

impl EddsaFamily {
    /// Private CKD with `prf` producing `IL || IR` from (chain code, message).
    fn private_step<F>(
        &self,
        scalar: &SecretBytes<32>,
        public_key: &[u8; 33],
        chain_code: &[u8; 32],
        index: u32,
        mut prf: F,
    ) -> Result<PrivateStep>
    where
        F: FnMut(&[u8], &[u8]) -> SecretBytes<64>,
    {
        let parent = load_scalar::<Ed25519>(scalar)?;
        let mut index = index;

        loop {
            let data = if is_hardened(index) {
                hardened_message(scalar, index)
            } else {
                normal_message(ED25519_PUBLIC_PREFIX, &public_key[1..], index)
            };
            let (il, ir) = prf(chain_code, data.as_bytes()).split();

            let tweak = Zeroizing::new(Ed25519::scalar_reduce(il.as_bytes()));
            let child = Zeroizing::new(Ed25519::scalar_add(&parent, &tweak));
            if !Ed25519::scalar_is_zero(&child) {
                return Ok(PrivateStep {
                    scalar: Ed25519::scalar_to_bytes(&child),
                    chain_code: ir,
                    index,
                });
            }

            debug!(curve = Ed25519::NAME, index, "zero child key, trying next index");
            index = next_index(index)?;
        }
    }

    fn public_step<F>(
        &self,
        public_key: &[u8; 33],
        chain_code: &[u8; 32],
        index: u32,
        mut prf: F,
    ) -> Result<PublicStep>
    where
        F: FnMut(&[u8], &[u8]) -> SecretBytes<64>,
    {
        if is_hardened(index) {
            return Err(Error::HardenedPublicDerivation { index });
        }
        let parent = load_point::<Ed25519>(public_key)?;
        let mut index = index;

        loop {
            let data = normal_message(ED25519_PUBLIC_PREFIX, &public_key[1..], index);
            let (il, ir) = prf(chain_code, data.as_bytes()).split();

            let tweak = Ed25519::scalar_reduce(il.as_bytes());
            let child = Ed25519::point_add(&parent, &Ed25519::mul_generator(&tweak));
            if !Ed25519::point_is_identity(&child) {
                return Ok(PublicStep {
                    public_key: Ed25519::point_to_bytes(&child),
                    chain_code: ir,
                    index,
                    delta: *Ed25519::scalar_to_bytes(&tweak).as_bytes(),
                });
            }

            debug!(curve = Ed25519::NAME, index, "identity child point, trying next index");
            index = next_index(index)?;
        }
    }
}

impl KeyFamily for EddsaFamily {
    fn seed_to_master(&self, seed: &[u8]) -> Result<(SecretBytes<32>, [u8; 32])> {
        let (il, ir) = hmac_sha512(MASTER_HMAC_KEY, seed).split();
        let k = Zeroizing::new(Ed25519::scalar_reduce(il.as_bytes()));
        if Ed25519::scalar_is_zero(&k) {
            return Err(Error::InvalidSeed);
        }
        Ok((Ed25519::scalar_to_bytes(&k), ir))
    }

    fn decode_scalar(&self, bytes: &[u8]) -> Result<SecretBytes<32>> {
        decode_scalar::<Ed25519>(bytes)
    }

    fn decode_point(&self, bytes: &[u8]) -> Result<[u8; 33]> {
        decode_point::<Ed25519>(bytes)
    }

    fn encode_point(&self, scalar: &SecretBytes<32>) -> Result<[u8; 33]> {
        encode_point::<Ed25519>(scalar)
    }

    fn derive_private(
        &self,
        scalar: &SecretBytes<32>,
        public_key: &[u8; 33],
        chain_code: &[u8; 32],
        index: u32,
    ) -> Result<PrivateStep> {
        self.private_step(scalar, public_key, chain_code, index, hmac_sha512)
    }

    fn derive_public(
        &self,
        public_key: &[u8; 33],
        chain_code: &[u8; 32],
        index: u32,
    ) -> Result<PublicStep> {
        self.public_step(public_key, chain_code, index, hmac_sha512)
    }

    fn add_deltas(&self, a: &[u8; 32], b: &[u8; 32]) -> Result<[u8; 32]> {
        add_deltas::<Ed25519>(a, b)
    }

    fn offset_point(&self, public_key: &[u8; 33], delta: &[u8; 32]) -> Result<[u8; 33]> {
        offset_point::<Ed25519>(public_key, delta)
    }
}
