//! Curve-family derivation engines.
//!
//! Two formulas exist: the BIP32 formula over Weierstrass curves
//! ([`ecdsa`]) and its little-endian Ed25519 analogue ([`eddsa`]). The facade
//! picks one through [`family`] and never branches on the curve again.

#![forbid(unsafe_code)]

mod ecdsa;
mod eddsa;

pub use self::eddsa::ED25519_PUBLIC_PREFIX;

use hdkey_core::{CurveTag, Error, Result};
use hdkey_crypto::curve::{CurveGroup, NistP256, Secp256k1};
use hdkey_crypto::SecretBytes;
use zeroize::Zeroizing;

use self::ecdsa::EcdsaFamily;
use self::eddsa::EddsaFamily;
use crate::path::is_hardened;

/// HMAC key for master key generation.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Outcome of one private derivation step.
pub(crate) struct PrivateStep {
    pub scalar: SecretBytes<32>,
    pub chain_code: [u8; 32],
    /// Index actually used; larger than requested if candidates were rejected.
    pub index: u32,
}

/// Outcome of one public derivation step.
pub(crate) struct PublicStep {
    pub public_key: [u8; 33],
    pub chain_code: [u8; 32],
    pub index: u32,
    /// Offset such that child = parent + delta*G.
    pub delta: [u8; 32],
}

/// Operations a curve family provides to the key facade.
///
/// Scalars are 32 bytes in the family's native byte order, public keys are
/// the 33-byte slot stored in extended keys.
pub(crate) trait KeyFamily: Send + Sync {
    /// HMAC-SHA512("Bitcoin seed", seed) -> (private key, chain code).
    fn seed_to_master(&self, seed: &[u8]) -> Result<(SecretBytes<32>, [u8; 32])>;

    /// Validate caller-supplied private key bytes.
    fn decode_scalar(&self, bytes: &[u8]) -> Result<SecretBytes<32>>;

    /// Validate caller-supplied public key bytes, normalized to the key slot.
    fn decode_point(&self, bytes: &[u8]) -> Result<[u8; 33]>;

    /// Public key slot for a private key.
    fn encode_point(&self, scalar: &SecretBytes<32>) -> Result<[u8; 33]>;

    fn derive_private(
        &self,
        scalar: &SecretBytes<32>,
        public_key: &[u8; 33],
        chain_code: &[u8; 32],
        index: u32,
    ) -> Result<PrivateStep>;

    fn derive_public(
        &self,
        public_key: &[u8; 33],
        chain_code: &[u8; 32],
        index: u32,
    ) -> Result<PublicStep>;

    /// a + b (mod n) for public derivation offsets.
    fn add_deltas(&self, a: &[u8; 32], b: &[u8; 32]) -> Result<[u8; 32]>;

    /// public_key + delta*G
    fn offset_point(&self, public_key: &[u8; 33], delta: &[u8; 32]) -> Result<[u8; 33]>;
}

static SECP256K1: EcdsaFamily<Secp256k1> = EcdsaFamily::new();
static P256: EcdsaFamily<NistP256> = EcdsaFamily::new();
static ED25519: EddsaFamily = EddsaFamily;

/// Engine for a curve.
pub(crate) fn family(curve: CurveTag) -> &'static dyn KeyFamily {
    match curve {
        CurveTag::Secp256k1 => &SECP256K1,
        CurveTag::P256 => &P256,
        CurveTag::Ed25519 => &ED25519,
    }
}

/// Index to try after a rejected candidate. Never wraps and never moves
/// between the normal and hardened ranges.
fn next_index(index: u32) -> Result<u32> {
    match index.checked_add(1) {
        Some(next) if is_hardened(next) == is_hardened(index) => Ok(next),
        _ => Err(Error::IndexRangeExhausted { index }),
    }
}

/// Hardened message: 0x00 || private key || ser32(index)
fn hardened_message(scalar: &SecretBytes<32>, index: u32) -> SecretBytes<37> {
    let mut data = SecretBytes::<37>::zeroed();
    let d = data.as_mut_bytes();
    d[0] = 0x00;
    d[1..33].copy_from_slice(scalar.as_bytes());
    d[33..37].copy_from_slice(&index.to_be_bytes());
    data
}

/// Normal message: lead byte || 32-byte point body || ser32(index)
fn normal_message(lead: u8, point: &[u8], index: u32) -> SecretBytes<37> {
    let mut data = SecretBytes::<37>::zeroed();
    let d = data.as_mut_bytes();
    d[0] = lead;
    d[1..33].copy_from_slice(point);
    d[33..37].copy_from_slice(&index.to_be_bytes());
    data
}

/// Decode a stored private key; zero and out-of-range values are rejected.
fn load_scalar<G: CurveGroup>(bytes: &SecretBytes<32>) -> Result<Zeroizing<G::Scalar>> {
    let scalar = G::scalar_from_bytes(bytes.as_bytes())
        .map(Zeroizing::new)
        .ok_or(Error::ScalarOutOfRange)?;
    if G::scalar_is_zero(&scalar) {
        return Err(Error::ScalarOutOfRange);
    }
    Ok(scalar)
}

fn load_point<G: CurveGroup>(bytes: &[u8]) -> Result<G::Point> {
    G::point_from_bytes(bytes).ok_or(Error::InvalidPoint("not a valid point on the curve"))
}

fn decode_scalar<G: CurveGroup>(bytes: &[u8]) -> Result<SecretBytes<32>> {
    let raw = SecretBytes::<32>::from_slice(bytes).ok_or_else(|| {
        Error::InvalidKey(format!("private key must be 32 bytes, got {}", bytes.len()))
    })?;
    load_scalar::<G>(&raw)?;
    Ok(raw)
}

fn decode_point<G: CurveGroup>(bytes: &[u8]) -> Result<[u8; 33]> {
    load_point::<G>(bytes).map(|point| G::point_to_bytes(&point))
}

fn encode_point<G: CurveGroup>(scalar: &SecretBytes<32>) -> Result<[u8; 33]> {
    let k = load_scalar::<G>(scalar)?;
    Ok(G::point_to_bytes(&G::mul_generator(&k)))
}

fn add_deltas<G: CurveGroup>(a: &[u8; 32], b: &[u8; 32]) -> Result<[u8; 32]> {
    let a = G::scalar_from_bytes(a).ok_or(Error::ScalarOutOfRange)?;
    let b = G::scalar_from_bytes(b).ok_or(Error::ScalarOutOfRange)?;
    Ok(*G::scalar_to_bytes(&G::scalar_add(&a, &b)).as_bytes())
}

fn offset_point<G: CurveGroup>(public_key: &[u8; 33], delta: &[u8; 32]) -> Result<[u8; 33]> {
    let point = load_point::<G>(public_key)?;
    let delta = G::scalar_from_bytes(delta).ok_or(Error::ScalarOutOfRange)?;
    let shifted = G::point_add(&point, &G::mul_generator(&delta));
    if G::point_is_identity(&shifted) {
        return Err(Error::InvalidPoint("offset reaches the identity"));
    }
    Ok(G::point_to_bytes(&shifted))
}
