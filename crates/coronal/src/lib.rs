//! Coronal magnetic field-line datasets.
//!
//! Field lines come from a potential-field source-surface model and are
//! delivered as JSON alongside each rotation's magnetogram. This crate
//! owns the wire model, the validation step that makes a dataset safe to
//! render, and the summary statistics used to compare model runs.

pub mod geometry;
pub mod model;
pub mod prepare;
pub mod stats;

pub use geometry::{distance, spherical_to_cartesian};
pub use model::{CoronalDataset, FieldLine, Metadata, Polarity};
pub use prepare::{from_json, from_slice, prepare, MIN_POINTS};
pub use stats::{compare, DatasetComparison, DatasetSummary, DiffStats, GeometryDiff};

use solar_common::SolarError;
use thiserror::Error;

/// Result type for coronal dataset operations.
pub type CoronalResult<T> = Result<T, CoronalError>;

#[derive(Error, Debug)]
pub enum CoronalError {
    /// A line's strengths do not pair up with its points.
    #[error("field line {index} has {points} points but {strengths} strengths")]
    LineShapeMismatch {
        index: usize,
        points: usize,
        strengths: usize,
    },

    #[error("malformed coronal JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoronalError {
    pub fn code(&self) -> &'static str {
        match self {
            CoronalError::LineShapeMismatch { .. } => "LineShapeMismatch",
            CoronalError::Json(_) => "MalformedJson",
        }
    }
}

impl From<CoronalError> for SolarError {
    fn from(err: CoronalError) -> Self {
        SolarError::Coronal(err.to_string())
    }
}
