//! Curve tags and the derivation family they belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Curves supported by the key tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveTag {
    /// secp256k1 (Bitcoin, Ethereum)
    Secp256k1,
    /// NIST P-256 / secp256r1
    P256,
    /// Edwards25519
    Ed25519,
}

/// Derivation formula family.
///
/// Weierstrass curves share the big-endian BIP32 formula and the
/// `xprv`/`xpub` versions; Ed25519 has its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyFamilyKind {
    Weierstrass,
    Edwards,
}

impl CurveTag {
    /// All supported curves.
    pub const ALL: [CurveTag; 3] = [CurveTag::Secp256k1, CurveTag::P256, CurveTag::Ed25519];

    /// Family whose derivation formula applies to this curve.
    pub const fn family(self) -> KeyFamilyKind {
        match self {
            Self::Secp256k1 | Self::P256 => KeyFamilyKind::Weierstrass,
            Self::Ed25519 => KeyFamilyKind::Edwards,
        }
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::P256 => "p256",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for CurveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "p256" | "p-256" | "secp256r1" | "nistp256" => Ok(Self::P256),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(Error::InvalidKey(format!("unknown curve '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family() {
        assert_eq!(CurveTag::Secp256k1.family(), KeyFamilyKind::Weierstrass);
        assert_eq!(CurveTag::P256.family(), KeyFamilyKind::Weierstrass);
        assert_eq!(CurveTag::Ed25519.family(), KeyFamilyKind::Edwards);
    }

    #[test]
    fn test_parse_names() {
        for curve in CurveTag::ALL {
            assert_eq!(curve.name().parse::<CurveTag>().unwrap(), curve);
        }
        assert_eq!("secp256r1".parse::<CurveTag>().unwrap(), CurveTag::P256);
        assert_eq!("Ed25519".parse::<CurveTag>().unwrap(), CurveTag::Ed25519);
        assert!("curve448".parse::<CurveTag>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&CurveTag::P256).unwrap();
        assert_eq!(json, "\"p256\"");
        let back: CurveTag = serde_json::from_str("\"secp256k1\"").unwrap();
        assert_eq!(back, CurveTag::Secp256k1);
    }
}
