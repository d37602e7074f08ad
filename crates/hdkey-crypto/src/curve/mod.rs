//! Prime-order group operations used by the key tree.
//!
//! Each supported curve is a zero-sized marker implementing [`CurveGroup`].
//! Scalars travel as 32 bytes in the curve's native order (big-endian for
//! the Weierstrass curves, little-endian for Ed25519); points travel as the
//! 33-byte key slot used by extended keys.

#![forbid(unsafe_code)]

mod ed25519;
mod weierstrass;

pub use ed25519::{Ed25519, ED25519_SLOT_TAG};
pub use weierstrass::{NistP256, Secp256k1};

use zeroize::Zeroize;

use crate::secret::SecretBytes;

/// Group arithmetic required by BIP32-style derivation.
pub trait CurveGroup: Send + Sync + 'static {
    /// Curve name used in logs.
    const NAME: &'static str;

    type Scalar: Copy + Zeroize;
    type Point: Copy;

    /// Decode a canonical scalar. Returns None if the value is not below the
    /// group order. Zero is accepted.
    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar>;

    fn scalar_to_bytes(scalar: &Self::Scalar) -> SecretBytes<32>;

    /// a + b (mod n)
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool;

    /// k*G
    fn mul_generator(scalar: &Self::Scalar) -> Self::Point;

    fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point;

    fn point_is_identity(point: &Self::Point) -> bool;

    /// Decode and validate a public point. The identity is rejected.
    fn point_from_bytes(bytes: &[u8]) -> Option<Self::Point>;

    /// Encode into the 33-byte key slot.
    ///
    /// The identity has no slot encoding and maps to all zeros, which is never
    /// a valid public key.
    fn point_to_bytes(point: &Self::Point) -> [u8; 33];
}
