//! Fixed-size secret byte container that wipes itself on drop.

#![forbid(unsafe_code)]

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret bytes (private scalars, HMAC outputs, derivation messages).
///
/// Storage is zeroed when the value is dropped, so temporaries created inside
/// retry loops are wiped on every exit path.
#[derive(Clone)]
pub struct SecretBytes<const N: usize>([u8; N]);

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of `bytes`.
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// All-zero buffer, to be filled in place.
    pub const fn zeroed() -> Self {
        Self([0u8; N])
    }

    /// Copy from a slice; returns None if the length differs from N.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != N {
            return None;
        }
        let mut out = Self::zeroed();
        out.0.copy_from_slice(bytes);
        Some(out)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; N] {
        &mut self.0
    }

    /// Check if every byte is zero (constant time).
    pub fn is_zero(&self) -> bool {
        bool::from(self.0.ct_eq(&[0u8; N]))
    }
}

impl SecretBytes<64> {
    /// Split a 64-byte HMAC output into `(IL, IR)`.
    ///
    /// IL stays secret; IR becomes a chain code, which is public data.
    pub fn split(&self) -> (SecretBytes<32>, [u8; 32]) {
        let mut left = SecretBytes::<32>::zeroed();
        left.0.copy_from_slice(&self.0[..32]);
        let mut right = [0u8; 32];
        right.copy_from_slice(&self.0[32..]);
        (left, right)
    }
}

impl<const N: usize> Zeroize for SecretBytes<N> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for SecretBytes<N> {}

impl<const N: usize> AsRef<[u8]> for SecretBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(<redacted>)")
    }
}
