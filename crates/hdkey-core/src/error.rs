use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid seed: master key is zero or not below the group order")]
    InvalidSeed,

    #[error("scalar out of range")]
    ScalarOutOfRange,

    #[error("invalid public key: {0}")]
    InvalidPoint(&'static str),

    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("invalid extended key length {got}: expected 78 bytes")]
    InvalidExtendedKeyLength { got: usize },

    #[error("unexpected extended key version {got:#010x}: expected {expected:#010x}")]
    VersionMismatch { got: u32, expected: u32 },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("hardened child {index:#010x} cannot be derived from a public key")]
    HardenedPublicDerivation { index: u32 },

    #[error("no valid child from index {index:#010x} to the end of its hardened or normal range")]
    IndexRangeExhausted { index: u32 },

    #[error("private key not available")]
    MissingPrivateKey,

    #[error("maximum derivation depth exceeded")]
    DepthOverflow,
}
