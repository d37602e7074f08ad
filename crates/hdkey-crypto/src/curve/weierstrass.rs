//! secp256k1 and P-256 through the RustCrypto `k256` / `p256` crates.
//!
//! Scalars are big-endian; points use SEC1 compressed form:
//! [0x02 | 0x03][x-coordinate]

#![forbid(unsafe_code)]

use super::CurveGroup;
use crate::secret::SecretBytes;

/// secp256k1 marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Secp256k1;

/// NIST P-256 marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NistP256;

// Both crates expose the same elliptic-curve 0.13 surface.
macro_rules! weierstrass_group {
    ($group:ident, $krate:ident, $curve:ident, $name:literal) => {
        impl CurveGroup for $group {
            const NAME: &'static str = $name;

            type Scalar = $krate::Scalar;
            type Point = $krate::ProjectivePoint;

            fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar> {
                let repr = $krate::FieldBytes::clone_from_slice(bytes);
                Option::from(<$krate::Scalar as $krate::elliptic_curve::ff::PrimeField>::from_repr(
                    repr,
                ))
            }

            fn scalar_to_bytes(scalar: &Self::Scalar) -> SecretBytes<32> {
                let repr = <$krate::Scalar as $krate::elliptic_curve::ff::PrimeField>::to_repr(scalar);
                let mut out = SecretBytes::<32>::zeroed();
                out.as_mut_bytes().copy_from_slice(&repr);
                out
            }

            fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
                *a + *b
            }

            fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
                bool::from(<$krate::Scalar as $krate::elliptic_curve::ff::Field>::is_zero(scalar))
            }

            fn mul_generator(scalar: &Self::Scalar) -> Self::Point {
                <$krate::ProjectivePoint as $krate::elliptic_curve::group::Group>::generator()
                    * *scalar
            }

            fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point {
                *a + *b
            }

            fn point_is_identity(point: &Self::Point) -> bool {
                bool::from(
                    <$krate::ProjectivePoint as $krate::elliptic_curve::group::Group>::is_identity(
                        point,
                    ),
                )
            }

            fn point_from_bytes(bytes: &[u8]) -> Option<Self::Point> {
                let encoded = $krate::EncodedPoint::from_bytes(bytes).ok()?;
                let affine: Option<$krate::AffinePoint> =
                    <$krate::AffinePoint as $krate::elliptic_curve::sec1::FromEncodedPoint<
                        $krate::$curve,
                    >>::from_encoded_point(&encoded)
                    .into();
                let point = $krate::ProjectivePoint::from(affine?);
                if Self::point_is_identity(&point) {
                    return None;
                }
                Some(point)
            }

            fn point_to_bytes(point: &Self::Point) -> [u8; 33] {
                let affine =
                    <$krate::ProjectivePoint as $krate::elliptic_curve::group::Curve>::to_affine(
                        point,
                    );
                let encoded = <$krate::AffinePoint as $krate::elliptic_curve::sec1::ToEncodedPoint<
                    $krate::$curve,
                >>::to_encoded_point(&affine, true);

                let mut out = [0u8; 33];
                if encoded.len() == 33 {
                    out.copy_from_slice(encoded.as_bytes());
                }
                out
            }
        }
    };
}

weierstrass_group!(Secp256k1, k256, Secp256k1, "secp256k1");
weierstrass_group!(NistP256, p256, NistP256, "p256");
