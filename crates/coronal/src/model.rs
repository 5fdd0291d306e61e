//! Wire model for coronal field-line datasets.

use serde::{Deserialize, Serialize};

use crate::geometry::{distance, radius};

/// How far below the source surface a line may end and still count as open.
pub const OPEN_TOLERANCE: f64 = 0.1;

/// Model parameters the dataset was generated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Maximum spherical harmonic degree.
    pub lmax: u32,
    /// Source surface radius in solar radii.
    pub r_source: f64,
    /// Line count as written by the producer.
    pub n_field_lines: u32,
}

/// Whether a field line reaches the source surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Open,
    Closed,
}

impl Polarity {
    /// Classify a traced line by the radius where it ended.
    pub fn from_end_radius(end_radius: f64, r_source: f64) -> Self {
        if end_radius > r_source - OPEN_TOLERANCE {
            Polarity::Open
        } else {
            Polarity::Closed
        }
    }
}

/// A traced magnetic field line.
///
/// `strengths[i]` is the field magnitude at `points[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLine {
    pub points: Vec<[f64; 3]>,
    pub strengths: Vec<f64>,
    pub polarity: Polarity,
}

impl FieldLine {
    /// Sum of segment lengths; 0 for fewer than two points.
    pub fn arc_length(&self) -> f64 {
        self.points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
    }

    pub fn mean_strength(&self) -> Option<f64> {
        if self.strengths.is_empty() {
            return None;
        }
        Some(self.strengths.iter().sum::<f64>() / self.strengths.len() as f64)
    }

    /// Distance of the last point from the Sun's center.
    pub fn end_radius(&self) -> Option<f64> {
        self.points.last().map(radius)
    }

    pub fn is_open(&self) -> bool {
        self.polarity == Polarity::Open
    }
}

/// A coronal model for one rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoronalDataset {
    pub metadata: Metadata,
    #[serde(rename = "fieldLines")]
    pub field_lines: Vec<FieldLine>,
}

impl CoronalDataset {
    pub fn len(&self) -> usize {
        self.field_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_lines.is_empty()
    }

    /// Open and closed line counts.
    pub fn polarity_counts(&self) -> (usize, usize) {
        let open = self.field_lines.iter().filter(|l| l.is_open()).count();
        (open, self.field_lines.len() - open)
    }

    /// Lines whose recorded polarity disagrees with their end radius.
    pub fn misclassified(&self) -> impl Iterator<Item = (usize, &FieldLine)> {
        let r_source = self.metadata.r_source;
        self.field_lines.iter().enumerate().filter(move |(_, line)| {
            line.end_radius()
                .map(|r| Polarity::from_end_radius(r, r_source) != line.polarity)
                .unwrap_or(false)
        })
    }
}
