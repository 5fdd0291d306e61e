//! Summary statistics for field-line datasets.
//!
//! Used to compare model runs of the same rotation (for example two
//! harmonic truncations) line by line. Lines are paired by position over
//! the common prefix, since both runs trace from the same seed points.

use serde::Serialize;

use crate::geometry::distance;
use crate::model::CoronalDataset;

/// Added to denominators of relative differences.
const RELATIVE_EPSILON: f64 = 1e-10;

/// Aggregate description of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub lmax: u32,
    pub r_source: f64,
    pub line_count: usize,
    pub open_count: usize,
    pub closed_count: usize,
    pub open_percent: f64,
    pub closed_percent: f64,
    pub mean_arc_length: f64,
    /// Mean of per-line mean strengths.
    pub mean_strength: Option<f64>,
    /// Smallest and largest strength sample.
    pub strength_range: Option<(f64, f64)>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &CoronalDataset) -> Self {
        let line_count = dataset.len();
        let (open_count, closed_count) = dataset.polarity_counts();

        let lengths: Vec<f64> = dataset.field_lines.iter().map(|l| l.arc_length()).collect();
        let strengths: Vec<f64> = dataset
            .field_lines
            .iter()
            .filter_map(|l| l.mean_strength())
            .collect();

        let strength_range = dataset
            .field_lines
            .iter()
            .flat_map(|l| l.strengths.iter().copied())
            .fold(None, |range: Option<(f64, f64)>, s| match range {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            });

        Self {
            lmax: dataset.metadata.lmax,
            r_source: dataset.metadata.r_source,
            line_count,
            open_count,
            closed_count,
            open_percent: percent(open_count, line_count),
            closed_percent: percent(closed_count, line_count),
            mean_arc_length: mean(&lengths).unwrap_or(0.0),
            mean_strength: mean(&strengths),
            strength_range,
        }
    }
}

/// Paired differences of one per-line quantity between two runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffStats {
    pub compared: usize,
    pub mean_a: f64,
    pub mean_b: f64,
    pub mean_absolute_diff: f64,
    pub max_absolute_diff: f64,
    pub mean_relative_diff_percent: f64,
}

impl DiffStats {
    /// Statistics over the common prefix of `a` and `b`; `None` if empty.
    pub fn paired(a: &[f64], b: &[f64]) -> Option<Self> {
        let n = a.len().min(b.len());
        if n == 0 {
            return None;
        }
        let (a, b) = (&a[..n], &b[..n]);

        let mut abs_sum = 0.0;
        let mut abs_max: f64 = 0.0;
        let mut rel_sum = 0.0;
        for (&x, &y) in a.iter().zip(b) {
            let diff = y - x;
            abs_sum += diff.abs();
            abs_max = abs_max.max(diff.abs());
            rel_sum += (100.0 * diff / (x + RELATIVE_EPSILON)).abs();
        }

        Some(Self {
            compared: n,
            mean_a: mean(a)?,
            mean_b: mean(b)?,
            mean_absolute_diff: abs_sum / n as f64,
            max_absolute_diff: abs_max,
            mean_relative_diff_percent: rel_sum / n as f64,
        })
    }
}

/// Point-to-point distance between paired lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryDiff {
    pub compared: usize,
    pub mean_point_distance: f64,
    pub max_point_distance: f64,
}

/// Line-by-line comparison of two datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetComparison {
    pub a: DatasetSummary,
    pub b: DatasetSummary,
    pub length: Option<DiffStats>,
    pub strength: Option<DiffStats>,
    pub geometry: Option<GeometryDiff>,
    /// `b.open_count - a.open_count`.
    pub open_delta: i64,
    /// `b.closed_count - a.closed_count`.
    pub closed_delta: i64,
}

/// Compare run `b` against run `a`.
pub fn compare(a: &CoronalDataset, b: &CoronalDataset) -> DatasetComparison {
    let summary_a = DatasetSummary::from_dataset(a);
    let summary_b = DatasetSummary::from_dataset(b);

    let lengths = |d: &CoronalDataset| -> Vec<f64> {
        d.field_lines.iter().map(|l| l.arc_length()).collect()
    };
    let strengths = |d: &CoronalDataset| -> Vec<f64> {
        d.field_lines.iter().filter_map(|l| l.mean_strength()).collect()
    };

    DatasetComparison {
        length: DiffStats::paired(&lengths(a), &lengths(b)),
        strength: DiffStats::paired(&strengths(a), &strengths(b)),
        geometry: geometry_diff(a, b),
        open_delta: summary_b.open_count as i64 - summary_a.open_count as i64,
        closed_delta: summary_b.closed_count as i64 - summary_a.closed_count as i64,
        a: summary_a,
        b: summary_b,
    }
}

/// Resample each pair of lines to the shorter point count by taking evenly
/// spaced indices, then measure distances between corresponding points.
fn geometry_diff(a: &CoronalDataset, b: &CoronalDataset) -> Option<GeometryDiff> {
    let mut per_line_means = Vec::new();
    let mut max_distance: f64 = 0.0;

    for (la, lb) in a.field_lines.iter().zip(&b.field_lines) {
        let n = la.points.len().min(lb.points.len());
        if n < 2 {
            continue;
        }
        let ia = even_indices(la.points.len(), n);
        let ib = even_indices(lb.points.len(), n);

        let distances: Vec<f64> = ia
            .zip(ib)
            .map(|(i, j)| distance(&la.points[i], &lb.points[j]))
            .collect();
        max_distance = distances.iter().copied().fold(max_distance, f64::max);
        per_line_means.extend(mean(&distances));
    }

    Some(GeometryDiff {
        compared: per_line_means.len(),
        mean_point_distance: mean(&per_line_means)?,
        max_point_distance: max_distance,
    })
}

/// `n` indices spread evenly over `0..len`, first and last included.
fn even_indices(len: usize, n: usize) -> impl Iterator<Item = usize> {
    let step = (len - 1) as f64 / (n - 1) as f64;
    (0..n).map(move |k| (k as f64 * step) as usize)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
