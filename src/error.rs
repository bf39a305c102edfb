use thiserror::Error;

/// Error type for secret sharing operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharingError {
    /// Secret length does not match the fixed key size
    #[error("Secret must be {expected} bytes, got {got}")]
    InvalidSecretLength { expected: usize, got: usize },

    /// Invalid threshold value
    #[error("Invalid threshold value {0}")]
    InvalidThreshold(usize),

    /// Invalid party count
    #[error("Invalid party count {0}")]
    InvalidPartyCount(usize),

    /// Threshold does not fit the party count
    #[error("Threshold {threshold} is too large for {parties} parties")]
    ThresholdTooLarge { threshold: usize, parties: usize },

    /// No shares were provided
    #[error("No shares provided")]
    NoShares,

    /// The 2-out-of-n message is empty
    #[error("Message must not be empty")]
    EmptyMessage,

    /// The replicated access structure would need too many atomic shares
    #[error("{needed} atomic shares per word exceeds the limit of {limit}")]
    TooManyAtomicShares { needed: usize, limit: usize },

    /// The replicated sharing would hand out too many atomic share copies
    #[error("{needed} held atomic share copies per word exceeds the limit of {limit}")]
    TooManyHeldShares { needed: usize, limit: usize },

    /// Insufficient shares for reconstruction
    #[error("Need at least {needed} shares, got {got}")]
    InsufficientShares { needed: usize, got: usize },

    /// Denominator without a multiplicative inverse during interpolation
    #[error("{value} has no inverse modulo {modulus}")]
    NoInverse { value: u64, modulus: u64 },

    /// Two rows did not differ in exactly one column
    #[error("Rows differ in {differing} columns, expected exactly one")]
    AmbiguousReconstruction { differing: usize },

    /// Two shares claim the same index
    #[error("Duplicate share index {0}")]
    DuplicateShareIndex(u32),

    /// A reconstructed word does not fit in 16 bits
    #[error("Reconstructed word {0} does not fit in 16 bits")]
    WordOutOfRange(u64),

    /// Invalid share format or content
    #[error("Invalid share format: {0}")]
    InvalidShareFormat(String),

    /// Shares disagree on scheme parameters
    #[error("Inconsistent shares: {0}")]
    InconsistentShares(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Randomness source failure: {0}")]
    Randomness(String),
}

/// Coarse classification of a [`SharingError`]
///
/// `InsufficientShares` is a normal operational condition (collect more
/// shares and retry); the others indicate misuse or corrupted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidArgument,
    InsufficientShares,
    Arithmetic,
    Ambiguous,
}

impl SharingError {
    /// Returns the category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientShares { .. } => ErrorCategory::InsufficientShares,
            Self::NoInverse { .. } | Self::Randomness(_) => ErrorCategory::Arithmetic,
            Self::AmbiguousReconstruction { .. } => ErrorCategory::Ambiguous,
            _ => ErrorCategory::InvalidArgument,
        }
    }
}

pub type Result<T> = std::result::Result<T, SharingError>;
