//! ICC Profile Error Types

use thiserror::Error;

/// Errors raised while validating an ICC profile header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IccError {
    /// Profile data is smaller than the fixed header
    #[error("Profile too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    /// Profile data exceeds the accepted ceiling
    #[error("Profile too large: {actual} bytes, max {max}")]
    TooLarge { max: usize, actual: usize },
    /// Invalid profile signature (should be 'acsp')
    #[error("Invalid profile signature: 0x{0:08X} (expected 'acsp')")]
    InvalidSignature(u32),
}

/// Errors raised while splitting or reassembling APP2 ICC markers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarkerError {
    /// Nothing to embed
    #[error("Empty ICC profile")]
    EmptyProfile,
    /// The one-byte count field can't describe this many chunks
    #[error("ICC profile too large: needs {needed} chunks (max {max})")]
    TooManyChunks { needed: usize, max: usize },
    /// Sequence number is zero or beyond the declared total
    #[error("Invalid ICC chunk sequence {sequence}/{total}")]
    InvalidSequence { sequence: u8, total: u8 },
    /// Two markers disagree on the total chunk count
    #[error("Inconsistent ICC chunk count: {found} vs {expected}")]
    InconsistentCount { expected: u8, found: u8 },
    /// Fewer (or more) chunks than declared
    #[error("Expected {expected} ICC chunks, found {found}")]
    MissingChunks { expected: u8, found: usize },
}

impl MarkerError {
    /// True for errors caused by the size of the profile rather than a
    /// malformed marker sequence.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::EmptyProfile | Self::TooManyChunks { .. })
    }
}
