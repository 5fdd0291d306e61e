//! Error types for the solar field viewer.

use thiserror::Error;

/// Result type alias using SolarError.
pub type SolarResult<T> = Result<T, SolarError>;

/// Errors raised while constructing a [`ScalarGrid`](crate::ScalarGrid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no samples (width or height is zero)")]
    Empty,

    #[error("grid expects {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("observed range is not finite or has min > max")]
    InvalidRange,
}

/// Primary error type surfaced to callers of the viewer core.
///
/// Each pipeline crate keeps its own precise error enum and converts into
/// this one at the boundary, so a UI only has to handle a single type.
#[derive(Debug, Error)]
pub enum SolarError {
    // === Dataset Errors ===
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Invalid magnetogram: {0}")]
    Decode(String),

    #[error("Invalid coronal dataset: {0}")]
    Coronal(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    // === Playback Errors ===
    #[error("Transition rejected: {0}")]
    Transition(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(String),
}

impl SolarError {
    /// Stable identifier for this error, suitable for UI message lookup.
    pub fn code(&self) -> &'static str {
        match self {
            SolarError::DatasetNotFound(_) => "DatasetNotFound",
            SolarError::Decode(_) => "InvalidMagnetogram",
            SolarError::Coronal(_) => "InvalidCoronalDataset",
            SolarError::Grid(GridError::Empty) => "EmptyGrid",
            SolarError::Grid(GridError::LengthMismatch { .. }) => "GridLengthMismatch",
            SolarError::Grid(GridError::InvalidRange) => "GridInvalidRange",
            SolarError::Transition(_) => "TransitionRejected",
            SolarError::Io(_) => "IoError",
        }
    }

    /// Whether retrying the fetch that produced this error could succeed.
    ///
    /// The core never retries; this is a hint for the fetch collaborator.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SolarError::Io(_))
    }
}

impl From<std::io::Error> for SolarError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SolarError::DatasetNotFound(err.to_string())
        } else {
            SolarError::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SolarError {
    fn from(err: serde_json::Error) -> Self {
        SolarError::Coronal(format!("JSON error: {}", err))
    }
}
