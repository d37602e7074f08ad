//! HASH160 = RIPEMD-160(SHA-256(data)), used for key identifiers and fingerprints.

#![forbid(unsafe_code)]

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute RIPEMD-160(SHA-256(data)).
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(sha));
    out
}

/// Parent fingerprint of a 33-byte public key slot: the first four bytes of
/// its HASH160, read big-endian.
pub fn fingerprint(public_key: &[u8; 33]) -> u32 {
    let id = hash160(public_key);
    u32::from_be_bytes([id[0], id[1], id[2], id[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash160_empty() {
        assert_eq!(
            hex::encode(hash160(b"")),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }

    #[test]
    fn test_bip32_master_fingerprint() {
        // BIP32 test vector 1: master public key and its fingerprint 3442193e
        let pubkey: [u8; 33] = hex::decode(
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2",
        )
        .unwrap()
        .try_into()
        .unwrap();
        assert_eq!(fingerprint(&pubkey), 0x3442193e);
    }
}
