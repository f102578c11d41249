//! Error types for rgb2cmyk

use std::fmt;

use thiserror::Error;

use crate::icc::{IccError, MarkerError};

/// Result type for rgb2cmyk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type carried across the collaborator boundary.
///
/// Image codecs and color transform engines report failures with whatever
/// error type their backend uses; the pipeline only needs to display and
/// chain them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in rgb2cmyk operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed ICC profile header
    #[error("ICC profile: {0}")]
    Icc(#[from] IccError),

    /// ICC marker chunking or reassembly failed
    #[error("ICC markers: {0}")]
    Marker(#[from] MarkerError),

    /// Pixel buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Zero or overflowing image dimensions
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Unknown rendering intent name
    #[error("Unknown rendering intent: {0:?}")]
    InvalidIntent(String),

    /// Malformed JPEG container structure
    #[error("JPEG structure: {0}")]
    Jpeg(String),

    /// Failure reported by the image codec or color transform engine
    #[error(transparent)]
    Collaborator(BoxError),
}

impl From<BoxError> for Error {
    /// Recovers an [`Error`] boxed by an engine adapter so its kind survives
    /// the collaborator boundary.
    fn from(err: BoxError) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => *err,
            Err(err) => Self::Collaborator(err),
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed ICC header or JPEG structure
    Validation,
    /// Marker sequence/count inconsistency or missing chunks
    Protocol,
    /// Profile too large (or empty) for the marker wire format
    Capacity,
    /// Caller-supplied buffers or parameters don't fit together
    Usage,
    /// Decode, transform or encode failure from an external collaborator
    Collaborator,
}

impl Error {
    /// Wrap a collaborator failure.
    pub fn collaborator(err: impl Into<BoxError>) -> Self {
        Self::Collaborator(err.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Icc(_) | Self::Jpeg(_) => ErrorKind::Validation,
            Self::Marker(e) if e.is_capacity() => ErrorKind::Capacity,
            Self::Marker(_) => ErrorKind::Protocol,
            Self::BufferSize { .. } | Self::InvalidDimensions { .. } | Self::InvalidIntent(_) => {
                ErrorKind::Usage
            }
            Self::Collaborator(_) => ErrorKind::Collaborator,
        }
    }
}

/// Pipeline stage at which a conversion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Decode,
    ProfileResolution,
    Transform,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Decode => "decode",
            Self::ProfileResolution => "profile resolution",
            Self::Transform => "color transform",
            Self::Encode => "encode",
        })
    }
}

/// A conversion failure annotated with the stage it occurred in.
#[derive(Error, Debug)]
#[error("{stage}: {error}")]
pub struct ConvertError {
    pub stage: Stage,
    #[source]
    pub error: Error,
}

impl ConvertError {
    pub fn new(stage: Stage, error: impl Into<Error>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }

    /// Classification of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Attach a [`Stage`] to fallible results.
pub(crate) trait StageExt<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, ConvertError>;
}

impl<T, E: Into<Error>> StageExt<T> for std::result::Result<T, E> {
    fn at(self, stage: Stage) -> std::result::Result<T, ConvertError> {
        self.map_err(|e| ConvertError::new(stage, e))
    }
}
