//! Base58Check encoding for extended keys.
//!
//! Bitcoin alphabet, 4-byte double-SHA256 checksum appended to the payload.

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};
use zeroize::Zeroizing;

/// Encode `payload` with a trailing checksum.
pub fn encode_check(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Decode a Base58Check string, verifying and stripping the checksum.
///
/// The payload may carry a private key, so it is returned in a buffer that is
/// wiped on drop.
pub fn decode_check(encoded: &str) -> Result<Zeroizing<Vec<u8>>> {
    bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map(Zeroizing::new)
        .map_err(|e| Error::InvalidEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let test_cases: &[&[u8]] = &[b"", b"a", &[0, 0, 0, 1, 2, 3], &[0xff; 78]];
        for data in test_cases {
            let encoded = encode_check(data);
            let decoded = decode_check(&encoded).unwrap();
            assert_eq!(decoded.as_slice(), *data);
        }
    }

    #[test]
    fn test_leading_zero_version() {
        // Version byte 0x00 payloads encode with a leading '1'
        let encoded = encode_check(&[0u8; 21]);
        assert!(encoded.starts_with('1'));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let mut raw = bs58::decode(encode_check(b"Hello World!")).into_vec().unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = bs58::encode(raw).into_string();
        assert!(matches!(
            decode_check(&tampered),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_invalid_character_rejected() {
        // '0', 'O', 'I' and 'l' are not in the alphabet
        assert!(decode_check("0OIl").is_err());
    }
}
