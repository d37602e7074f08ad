//! BIP32 derivation over short Weierstrass curves.
//!
//! One generic engine serves secp256k1 and P-256. Scalars are big-endian and
//! public keys are SEC1 compressed.

#![forbid(unsafe_code)]

use std::marker::PhantomData;

use hdkey_core::{Error, Result};
use hdkey_crypto::curve::CurveGroup;
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

/// BIP32 engine for curve `G`.
pub(crate) struct EcdsaFamily<G>(PhantomData<G>);

impl<G> EcdsaFamily<G> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<G: CurveGroup> EcdsaFamily<G> {
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
        let parent = load_scalar::<G>(scalar)?;
        let mut index = index;

        loop {
            let data = if is_hardened(index) {
                hardened_message(scalar, index)
            } else {
                normal_message(public_key[0], &public_key[1..], index)
            };
            let (il, ir) = prf(chain_code, data.as_bytes()).split();

            if let Some(tweak) = G::scalar_from_bytes(il.as_bytes()).map(Zeroizing::new) {
                let child = Zeroizing::new(G::scalar_add(&parent, &tweak));
                if !G::scalar_is_zero(&child) {
                    return Ok(PrivateStep {
                        scalar: G::scalar_to_bytes(&child),
                        chain_code: ir,
                        index,
                    });
                }
            }

            debug!(curve = G::NAME, index, "invalid child key, trying next index");
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
        let parent = load_point::<G>(public_key)?;
        let mut index = index;

        loop {
            let data = normal_message(public_key[0], &public_key[1..], index);
            let (il, ir) = prf(chain_code, data.as_bytes()).split();

            if let Some(tweak) = G::scalar_from_bytes(il.as_bytes()) {
                let child = G::point_add(&parent, &G::mul_generator(&tweak));
                if !G::point_is_identity(&child) {
                    return Ok(PublicStep {
                        public_key: G::point_to_bytes(&child),
                        chain_code: ir,
                        index,
                        delta: *G::scalar_to_bytes(&tweak).as_bytes(),
                    });
                }
            }

            debug!(curve = G::NAME, index, "invalid child point, trying next index");
            index = next_index(index)?;
        }
    }
}

impl<G: CurveGroup> KeyFamily for EcdsaFamily<G> {
    fn seed_to_master(&self, seed: &[u8]) -> Result<(SecretBytes<32>, [u8; 32])> {
        let (il, ir) = hmac_sha512(MASTER_HMAC_KEY, seed).split();

        // IL is used as-is; parse_256(IL) >= n or == 0 means the seed is unusable
        match G::scalar_from_bytes(il.as_bytes()).map(Zeroizing::new) {
            Some(k) if !G::scalar_is_zero(&k) => Ok((il, ir)),
            _ => Err(Error::InvalidSeed),
        }
    }

    fn decode_scalar(&self, bytes: &[u8]) -> Result<SecretBytes<32>> {
        decode_scalar::<G>(bytes)
    }

    fn decode_point(&self, bytes: &[u8]) -> Result<[u8; 33]> {
        decode_point::<G>(bytes)
    }

    fn encode_point(&self, scalar: &SecretBytes<32>) -> Result<[u8; 33]> {
        encode_point::<G>(scalar)
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
        add_deltas::<G>(a, b)
    }

    fn offset_point(&self, public_key: &[u8; 33], delta: &[u8; 32]) -> Result<[u8; 33]> {
        offset_point::<G>(public_key, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::HARDENED;
    use hdkey_crypto::curve::{NistP256, Secp256k1};

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_master_key_vector_1() {
        let seed = hex::decode(SEED).unwrap();
        let (k, c) = EcdsaFamily::<Secp256k1>::new().seed_to_master(&seed).unwrap();
        assert_eq!(
            hex::encode(k.as_bytes()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(c),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_p256_master_shares_hmac_output() {
        let seed = hex::decode(SEED).unwrap();
        let (a, ca) = EcdsaFamily::<Secp256k1>::new().seed_to_master(&seed).unwrap();
        let (b, cb) = EcdsaFamily::<NistP256>::new().seed_to_master(&seed).unwrap();
        assert_eq!(a, b);
        assert_eq!(ca, cb);
    }

    #[test]
    fn test_hardened_child_vector_1() {
        let family = EcdsaFamily::<Secp256k1>::new();
        let seed = hex::decode(SEED).unwrap();
        let (k, c) = family.seed_to_master(&seed).unwrap();
        let public = family.encode_point(&k).unwrap();

        let step = family.derive_private(&k, &public, &c, 0x8000_0000).unwrap();
        assert_eq!(step.index, 0x8000_0000);
        assert_eq!(
            hex::encode(step.scalar.as_bytes()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(step.chain_code),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );
    }

    #[test]
    fn test_public_step_agrees_with_private_step() {
        let family = EcdsaFamily::<NistP256>::new();
        let seed = hex::decode(SEED).unwrap();
        let (k, c) = family.seed_to_master(&seed).unwrap();
        let public = family.encode_point(&k).unwrap();

        let private = family.derive_private(&k, &public, &c, 7).unwrap();
        let public_step = family.derive_public(&public, &c, 7).unwrap();

        assert_eq!(family.encode_point(&private.scalar).unwrap(), public_step.public_key);
        assert_eq!(private.chain_code, public_step.chain_code);
        assert_eq!(
            family.offset_point(&public, &public_step.delta).unwrap(),
            public_step.public_key
        );
    }

    #[test]
    fn test_public_step_rejects_hardened() {
        let family = EcdsaFamily::<Secp256k1>::new();
        let seed = hex::decode(SEED).unwrap();
        let (k, c) = family.seed_to_master(&seed).unwrap();
        let public = family.encode_point(&k).unwrap();
        assert_eq!(
            family.derive_public(&public, &c, 0x8000_0001).err(),
            Some(Error::HardenedPublicDerivation { index: 0x8000_0001 })
        );
    }

    /// secp256k1 with every scalar at or above 2^255 treated as out of range,
    /// so roughly half of all IL values are rejected.
    struct TopBitClear;

    impl CurveGroup for TopBitClear {
        const NAME: &'static str = "secp256k1-top-bit-clear";

        type Scalar = <Secp256k1 as CurveGroup>::Scalar;
        type Point = <Secp256k1 as CurveGroup>::Point;

        fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar> {
            if bytes[0] & 0x80 != 0 {
                return None;
            }
            Secp256k1::scalar_from_bytes(bytes)
        }

        fn scalar_to_bytes(scalar: &Self::Scalar) -> SecretBytes<32> {
            Secp256k1::scalar_to_bytes(scalar)
        }

        fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
            Secp256k1::scalar_add(a, b)
        }

        fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
            Secp256k1::scalar_is_zero(scalar)
        }

        fn mul_generator(scalar: &Self::Scalar) -> Self::Point {
            Secp256k1::mul_generator(scalar)
        }

        fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point {
            Secp256k1::point_add(a, b)
        }

        fn point_is_identity(point: &Self::Point) -> bool {
            Secp256k1::point_is_identity(point)
        }

        fn point_from_bytes(bytes: &[u8]) -> Option<Self::Point> {
            Secp256k1::point_from_bytes(bytes)
        }

        fn point_to_bytes(point: &Self::Point) -> [u8; 33] {
            Secp256k1::point_to_bytes(point)
        }
    }

    /// Parent with a top-bit-clear scalar: k = 0x1111..11, c = 0x2222..22.
    fn retry_parent() -> (SecretBytes<32>, [u8; 33], [u8; 32]) {
        let k = SecretBytes::new([0x11; 32]);
        let public = EcdsaFamily::<Secp256k1>::new().encode_point(&k).unwrap();
        (k, public, [0x22; 32])
    }

    /// Returns `first_il || 0x5a..` on the first call, HMAC-SHA512 afterwards.
    fn first_output(first_il: [u8; 32]) -> impl FnMut(&[u8], &[u8]) -> SecretBytes<64> {
        let mut calls = 0;
        move |key: &[u8], data: &[u8]| {
            calls += 1;
            if calls == 1 {
                let mut out = [0x5a; 64];
                out[..32].copy_from_slice(&first_il);
                SecretBytes::new(out)
            } else {
                hmac_sha512(key, data)
            }
        }
    }

    #[test]
    fn test_rejected_il_advances_index() {
        let family = EcdsaFamily::<TopBitClear>::new();
        let (k, public, c) = retry_parent();

        // IL has its top bit set at normal indices 4, 6, 7 and hardened 2, 4
        let cases = [
            (0, 0),
            (4, 5),
            (6, 8),
            (HARDENED + 2, HARDENED + 3),
            (HARDENED + 4, HARDENED + 5),
        ];
        for (requested, used) in cases {
            let step = family.derive_private(&k, &public, &c, requested).unwrap();
            assert_eq!(step.index, used, "requested {requested:#x}");

            let direct = family.derive_private(&k, &public, &c, used).unwrap();
            assert_eq!(direct.index, used);
            assert_eq!(direct.scalar, step.scalar);
            assert_eq!(direct.chain_code, step.chain_code);
        }
    }

    #[test]
    fn test_public_retry_lands_on_private_index() {
        let family = EcdsaFamily::<TopBitClear>::new();
        let reference = EcdsaFamily::<Secp256k1>::new();
        let (k, public, c) = retry_parent();

        for requested in [4, 6] {
            let private = family.derive_private(&k, &public, &c, requested).unwrap();
            let public_step = family.derive_public(&public, &c, requested).unwrap();

            assert!(public_step.index > requested);
            assert_eq!(public_step.index, private.index);
            assert_eq!(public_step.chain_code, private.chain_code);
            assert_eq!(
                reference.encode_point(&private.scalar).unwrap(),
                public_step.public_key
            );
        }
    }

    #[test]
    fn test_zero_child_advances_index() {
        let family = EcdsaFamily::<Secp256k1>::new();
        let (k, public, c) = retry_parent();
        let parent = Secp256k1::scalar_from_bytes(k.as_bytes()).unwrap();
        // IL = -k makes the child scalar zero and the child point the identity
        let negated = *Secp256k1::scalar_to_bytes(&-parent).as_bytes();

        for requested in [3, HARDENED + 3] {
            let step = family
                .private_step(&k, &public, &c, requested, first_output(negated))
                .unwrap();
            let expected = family.derive_private(&k, &public, &c, requested + 1).unwrap();
            assert_eq!(step.index, requested + 1);
            assert_eq!(step.scalar, expected.scalar);
            assert_eq!(step.chain_code, expected.chain_code);
        }

        let step = family
            .public_step(&public, &c, 3, first_output(negated))
            .unwrap();
        let expected = family.derive_public(&public, &c, 4).unwrap();
        assert_eq!(step.index, 4);
        assert_eq!(step.public_key, expected.public_key);
        assert_eq!(step.chain_code, expected.chain_code);
    }

    #[test]
    fn test_retry_never_crosses_hardened_boundary() {
        let family = EcdsaFamily::<Secp256k1>::new();
        let (k, public, c) = retry_parent();
        // IL = 0xff..ff is above n, so every candidate is rejected
        let rejecting = |_: &[u8], _: &[u8]| SecretBytes::new([0xff; 64]);

        for index in [HARDENED - 1, u32::MAX] {
            assert_eq!(
                family.private_step(&k, &public, &c, index, rejecting).err(),
                Some(Error::IndexRangeExhausted { index })
            );
        }
        assert_eq!(
            family.public_step(&public, &c, HARDENED - 1, rejecting).err(),
            Some(Error::IndexRangeExhausted { index: HARDENED - 1 })
        );
    }
}
