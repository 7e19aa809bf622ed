use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unrecognized key format: {0}")]
    KeyFormatNotFound(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("derivation at index {index} produced an unusable key: {reason}")]
    InvalidKeyForIndex { index: u32, reason: &'static str },

    #[error("hardened derivation requires a private key")]
    PublicDerivationFailure,

    #[error("operation requires private material this node does not carry")]
    PrivatePublicMismatch,

    #[error("inconsistent key import: {0}")]
    Import(String),

    #[error("malformed derivation path: {0}")]
    InvalidPath(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("maximum derivation depth (255) exceeded")]
    DepthExceeded,

    #[error("seed generation failed: {0}")]
    Seed(#[from] SeedError),
}

/// Failures specific to master-seed generation and validation.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("random source failure: {0}")]
    Rng(#[from] rand::Error),

    #[error("seed must be between 16 and 64 bytes, got {0}")]
    Length(usize),

    #[error("seed hash does not yield a valid key scalar")]
    Invalid,

    #[error("no valid seed produced after {0} attempts")]
    AttemptsExhausted(u32),
}
