//! FITS image decoder for synoptic magnetograms.
//!
//! Decodes the subset of FITS used by the magnetogram archive: a primary
//! header unit with a 2-D image, `BITPIX` in `{8, 16, 32, -32, -64}`, and
//! optional `BSCALE`/`BZERO` scaling. The result is an immutable
//! [`ScalarGrid`] ready for normalization.
//!
//! Decoding is a pure transform over an in-memory buffer. A failed decode
//! never exposes a partially built grid.

pub mod header;
pub mod unpacking;

pub use header::{parse_header, Card, FitsHeader, BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use unpacking::SampleEncoding;

use solar_common::{GridError, ScalarGrid, SolarError};
use thiserror::Error;
use tracing::{debug, warn};

/// Result type for FITS decoding.
pub type FitsResult<T> = Result<T, FitsError>;

/// Error types for FITS decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitsError {
    /// `NAXIS1`/`NAXIS2` absent or not positive
    #[error("missing or non-positive dimension: {0}")]
    MissingDimension(String),

    /// `BITPIX` outside the supported set
    #[error("unsupported BITPIX encoding: {0}")]
    UnsupportedEncoding(i64),

    /// Buffer ends before all samples are read
    #[error("truncated payload: need {expected} bytes, have {available}")]
    TruncatedPayload { expected: usize, available: usize },

    /// Buffer ends before the `END` card
    #[error("header has no END card")]
    TruncatedHeader,

    /// A required keyword other than the dimensions is absent
    #[error("missing required keyword: {0}")]
    MissingKeyword(String),

    /// A keyword value could not be parsed
    #[error("invalid value for {keyword}: '{value}'")]
    InvalidCard { keyword: String, value: String },

    /// `NAXIS` present but not 2
    #[error("expected a 2-D image, NAXIS = {0}")]
    UnsupportedAxisCount(i64),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl FitsError {
    /// Stable identifier for UI surfacing.
    pub fn code(&self) -> &'static str {
        match self {
            FitsError::MissingDimension(_) => "MissingDimension",
            FitsError::UnsupportedEncoding(_) => "UnsupportedEncoding",
            FitsError::TruncatedPayload { .. } => "TruncatedPayload",
            FitsError::TruncatedHeader => "TruncatedHeader",
            FitsError::MissingKeyword(_) => "MissingKeyword",
            FitsError::InvalidCard { .. } => "InvalidCard",
            FitsError::UnsupportedAxisCount(_) => "UnsupportedAxisCount",
            FitsError::Grid(_) => "InvalidGrid",
        }
    }
}

impl From<FitsError> for SolarError {
    fn from(err: FitsError) -> Self {
        match err {
            FitsError::Grid(e) => SolarError::Grid(e),
            other => SolarError::Decode(other.to_string()),
        }
    }
}

/// A decoded image along with its header and decode statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub header: FitsHeader,
    pub grid: ScalarGrid,
    /// Number of NaN/Inf samples replaced with 0.
    pub non_finite: usize,
}

/// Decode a FITS buffer into a [`ScalarGrid`].
pub fn decode(data: &[u8]) -> FitsResult<ScalarGrid> {
    decode_with_report(data).map(|image| image.grid)
}

/// Decode a FITS buffer, keeping the header and replacement count.
pub fn decode_with_report(data: &[u8]) -> FitsResult<DecodedImage> {
    let header = parse_header(data)?;

    let payload = data.get(header.data_offset..).unwrap_or(&[]);

    // Dimensions come from the file; reject any the buffer cannot hold
    // before allocating for them.
    let (count, expected) = match (header.sample_count(), header.payload_len()) {
        (Some(count), Some(expected)) => (count, expected),
        _ => (0, usize::MAX),
    };
    if payload.len() < expected {
        return Err(FitsError::TruncatedPayload {
            expected,
            available: payload.len(),
        });
    }

    let unpacked = unpacking::unpack_samples(
        payload,
        count,
        header.encoding,
        header.bscale,
        header.bzero,
    )?;

    if unpacked.non_finite > 0 {
        warn!(
            non_finite = unpacked.non_finite,
            percent = 100.0 * unpacked.non_finite as f64 / count as f64,
            "Replaced non-finite samples with 0.0"
        );
    }

    debug!(
        width = header.width,
        height = header.height,
        min = unpacked.min,
        max = unpacked.max,
        "Decoded magnetogram"
    );

    let grid = ScalarGrid::with_range(
        header.width,
        header.height,
        unpacked.values,
        unpacked.min,
        unpacked.max,
    )?;

    Ok(DecodedImage {
        header,
        grid,
        non_finite: unpacked.non_finite,
    })
}
