//! Edwards25519 through `curve25519-dalek`.
//!
//! Scalars are little-endian. The public key slot is `0x00 || compressed Y`
//! so that it has the same 33-byte width as a SEC1 compressed point.

#![forbid(unsafe_code)]

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::traits::IsIdentity;
use curve25519_dalek::Scalar;

use super::CurveGroup;
use crate::secret::SecretBytes;

/// Lead byte of the Ed25519 public key slot.
pub const ED25519_SLOT_TAG: u8 = 0x00;

/// Edwards25519 marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ed25519;

impl Ed25519 {
    /// Reduce a little-endian 256-bit integer modulo the group order.
    pub fn scalar_reduce(bytes: &[u8; 32]) -> Scalar {
        Scalar::from_bytes_mod_order(*bytes)
    }

    /// Raw 32-byte Edwards encoding of a point.
    pub fn point_to_compressed(point: &EdwardsPoint) -> [u8; 32] {
        point.compress().to_bytes()
    }
}

impl CurveGroup for Ed25519 {
    const NAME: &'static str = "ed25519";

    type Scalar = Scalar;
    type Point = EdwardsPoint;

    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar> {
        Option::from(Scalar::from_canonical_bytes(*bytes))
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> SecretBytes<32> {
        SecretBytes::new(scalar.to_bytes())
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        a + b
    }

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
        *scalar == Scalar::ZERO
    }

    fn mul_generator(scalar: &Self::Scalar) -> Self::Point {
        EdwardsPoint::mul_base(scalar)
    }

    fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point {
        a + b
    }

    fn point_is_identity(point: &Self::Point) -> bool {
        point.is_identity()
    }

    /// Accepts the raw 32-byte encoding or the tagged 33-byte slot. Points
    /// outside the prime-order subgroup are rejected.
    fn point_from_bytes(bytes: &[u8]) -> Option<Self::Point> {
        let raw: [u8; 32] = match bytes.len() {
            32 => bytes.try_into().ok()?,
            33 if bytes[0] == ED25519_SLOT_TAG => bytes[1..].try_into().ok()?,
            _ => return None,
        };

        let point = CompressedEdwardsY(raw).decompress()?;
        if point.is_identity() || !point.is_torsion_free() {
            return None;
        }
        Some(point)
    }

    fn point_to_bytes(point: &Self::Point) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = ED25519_SLOT_TAG;
        out[1..].copy_from_slice(&Self::point_to_compressed(point));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes32(s: &str) -> [u8; 32] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_basepoint_encoding() {
        let mut one = [0u8; 32];
        one[0] = 1;
        let k = Ed25519::scalar_from_bytes(&one).unwrap();
        let slot = Ed25519::point_to_bytes(&Ed25519::mul_generator(&k));
        assert_eq!(slot[0], 0x00);
        assert_eq!(
            hex::encode(&slot[1..]),
            "5866666666666666666666666666666666666666666666666666666666666666"
        );
    }

    #[test]
    fn test_rfc8032_public_key() {
        // RFC 8032 test 1: clamped secret scalar -> public key
        let scalar = bytes32("307c83864f2833cb427a2ef1c00a013cfdff2768d980c0a3a520f006904de94f");
        let k = Ed25519::scalar_reduce(&scalar);
        let pubkey = Ed25519::point_to_compressed(&Ed25519::mul_generator(&k));
        assert_eq!(
            hex::encode(pubkey),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn test_canonical_scalar() {
        // l = 2^252 + 27742317777372353535851937790883648493, little-endian
        let l = bytes32("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");
        assert!(Ed25519::scalar_from_bytes(&l).is_none());
        assert!(Ed25519::scalar_is_zero(&Ed25519::scalar_reduce(&l)));
    }

    #[test]
    fn test_point_validation() {
        // Identity
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(Ed25519::point_from_bytes(&identity).is_none());
        // y = 0 decodes to a point of order 4
        assert!(Ed25519::point_from_bytes(&[0u8; 32]).is_none());
        // Wrong slot tag and wrong length
        let mut slot = [0u8; 33];
        slot[0] = 0x02;
        assert!(Ed25519::point_from_bytes(&slot).is_none());
        assert!(Ed25519::point_from_bytes(&[0u8; 31]).is_none());
    }

    #[test]
    fn test_slot_round_trip() {
        let k = Ed25519::scalar_reduce(&[7u8; 32]);
        let slot = Ed25519::point_to_bytes(&Ed25519::mul_generator(&k));
        let decoded = Ed25519::point_from_bytes(&slot).unwrap();
        assert_eq!(Ed25519::point_to_bytes(&decoded), slot);
        // The untagged form decodes to the same point
        let decoded = Ed25519::point_from_bytes(&slot[1..]).unwrap();
        assert_eq!(Ed25519::point_to_bytes(&decoded), slot);
    }
}
