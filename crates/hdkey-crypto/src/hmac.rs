//! HMAC-SHA512 (RFC 2104 / RFC 4231), the keyed hash behind every derivation step.

#![forbid(unsafe_code)]

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::secret::SecretBytes;

type HmacSha512 = Hmac<Sha512>;

/// Compute HMAC-SHA512(key, data).
///
/// The 64-byte output is returned in a zeroize-on-drop buffer since its left
/// half becomes key material.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> SecretBytes<64> {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key)
        .expect("this never fails: hmac can handle keys of any size");
    mac.update(data);

    let mut out = SecretBytes::<64>::zeroed();
    out.as_mut_bytes()
        .copy_from_slice(&mac.finalize().into_bytes());
    out
}
