//! Validation of raw coronal datasets.

use tracing::debug;

use crate::model::CoronalDataset;
use crate::{CoronalError, CoronalResult};

/// Fewest points a line needs to be drawn.
pub const MIN_POINTS: usize = 2;

/// Make a raw dataset safe to render.
///
/// Every line is checked for matching `points`/`strengths` lengths before
/// anything is dropped, so the error index is the line's position in the
/// raw list. Lines with fewer than [`MIN_POINTS`] points are then removed;
/// the order of the remaining lines is preserved.
pub fn prepare(raw: CoronalDataset) -> CoronalResult<CoronalDataset> {
    for (index, line) in raw.field_lines.iter().enumerate() {
        if line.points.len() != line.strengths.len() {
            return Err(CoronalError::LineShapeMismatch {
                index,
                points: line.points.len(),
                strengths: line.strengths.len(),
            });
        }
    }

    let CoronalDataset {
        metadata,
        field_lines,
    } = raw;
    let total = field_lines.len();
    let field_lines: Vec<_> = field_lines
        .into_iter()
        .filter(|line| line.points.len() >= MIN_POINTS)
        .collect();

    let dropped = total - field_lines.len();
    if dropped > 0 {
        debug!(dropped, kept = field_lines.len(), "Dropped degenerate field lines");
        metrics::counter!("coronal_lines_dropped_total").increment(dropped as u64);
    }
    if metadata.n_field_lines as usize != field_lines.len() {
        debug!(
            declared = metadata.n_field_lines,
            retained = field_lines.len(),
            "Field line count differs from metadata"
        );
    }

    Ok(CoronalDataset {
        metadata,
        field_lines,
    })
}

/// Parse and [`prepare`] a dataset from JSON text.
pub fn from_json(json: &str) -> CoronalResult<CoronalDataset> {
    prepare(serde_json::from_str(json)?)
}

/// Parse and [`prepare`] a dataset from JSON bytes.
pub fn from_slice(bytes: &[u8]) -> CoronalResult<CoronalDataset> {
    prepare(serde_json::from_slice(bytes)?)
}
