//! Derivation path grammar.
//!
//! ```text
//! path    := "m" ("/" segment)*
//! segment := digits ["'"]
//! ```
//!
//! Segment values range over `[0, 2^31]` and a trailing `'` sets the hardened
//! bit. The value `2^31` already carries that bit, so `m/2147483648` and
//! `m/2147483648'` both name `0x80000000` and format as `m/0'`. Formatting is
//! the exact inverse for canonical paths: `m/44'/60/0`.

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use hdkey_core::{Error, Result};

/// Hardened derivation flag.
pub const HARDENED: u32 = 0x80000000;

/// Check if an index selects hardened derivation.
pub const fn is_hardened(index: u32) -> bool {
    index & HARDENED != 0
}

/// Parsed derivation path: ordered child indices from the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// The empty path `m`.
    pub const fn master() -> Self {
        Self(Vec::new())
    }

    /// Parse a path string.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(invalid(path, "empty path"));
        }

        let mut segments = path.split('/');
        if segments.next() != Some("m") {
            return Err(invalid(path, "path must start with 'm'"));
        }

        let indices = segments
            .map(|segment| parse_segment(path, segment))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(indices))
    }

    /// Extend the path by one index.
    pub fn child(&self, index: u32) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }

    /// True if every segment can be derived publicly.
    pub fn is_hardened_free(&self) -> bool {
        self.0.iter().all(|&index| !is_hardened(index))
    }
}

fn invalid(path: &str, reason: &str) -> Error {
    Error::InvalidDerivationPath(format!("'{path}': {reason}"))
}

fn parse_segment(path: &str, segment: &str) -> Result<u32> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() {
        return Err(invalid(path, "empty segment"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(path, &format!("segment '{segment}' is not a number")));
    }

    // Accumulate with overflow checks; segments may be arbitrarily long
    let value = digits.bytes().try_fold(0u32, |acc, b| {
        acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
    });
    match value {
        Some(v) if v <= HARDENED => Ok(if hardened { v | HARDENED } else { v }),
        _ => Err(invalid(path, &format!("segment '{segment}' exceeds 2^31"))),
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for &index in &self.0 {
            write!(f, "/{}", index & !HARDENED)?;
            if is_hardened(index) {
                f.write_str("'")?;
            }
        }
        Ok(())
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(indices: Vec<u32>) -> Self {
        Self(indices)
    }
}

impl AsRef<[u32]> for DerivationPath {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
