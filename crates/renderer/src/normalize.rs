//! Mapping raw field values into the unit interval.
//!
//! Bounds either follow the grid's observed range (`Auto`) or are pinned by
//! the caller (`Fixed`) so several rotations share one color scale. A range
//! of zero width cannot be divided by; every sample then maps to the
//! neutral midpoint and the result is flagged as degenerate.

use serde::{Deserialize, Serialize};
use solar_common::ScalarGrid;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Midpoint every sample maps to when the range has zero width.
pub const DEGENERATE_VALUE: f64 = 0.5;

/// How normalization bounds are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum NormalizationSpec {
    /// Use the grid's observed minimum and maximum.
    #[default]
    Auto,
    /// Use caller-supplied bounds.
    Fixed { min: f64, max: f64 },
}

impl NormalizationSpec {
    pub fn fixed(min: f64, max: f64) -> Self {
        NormalizationSpec::Fixed { min, max }
    }

    /// Returns an error when fixed bounds are NaN or infinite.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            NormalizationSpec::Auto => Ok(()),
            NormalizationSpec::Fixed { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(format!("fixed bounds must be finite, got [{}, {}]", min, max));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for NormalizationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationSpec::Auto => write!(f, "auto"),
            NormalizationSpec::Fixed { min, max } => write!(f, "fixed:{}:{}", min, max),
        }
    }
}

/// Parses `auto` or `fixed:<min>:<max>`.
impl FromStr for NormalizationSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(NormalizationSpec::Auto);
        }

        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(mode), Some(min), Some(max)) if mode.eq_ignore_ascii_case("fixed") => {
                let min: f64 = min
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid fixed minimum '{}'", min))?;
                let max: f64 = max
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid fixed maximum '{}'", max))?;
                let spec = NormalizationSpec::fixed(min, max);
                spec.validate()?;
                Ok(spec)
            }
            _ => Err(format!(
                "unknown normalization '{}', expected 'auto' or 'fixed:<min>:<max>'",
                s
            )),
        }
    }
}

/// Resolved normalization bounds with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Bounds from two values in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when the bounds cannot spread values over `[0, 1]`: equal or
    /// non-finite.
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        !(span.is_finite() && span > 0.0)
    }

    /// Smallest bounds covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Bounds that `spec` selects for `grid`.
///
/// Reversed fixed bounds are swapped.
pub fn resolve_bounds(grid: &ScalarGrid, spec: &NormalizationSpec) -> Bounds {
    match *spec {
        NormalizationSpec::Auto => Bounds::new(grid.observed_min(), grid.observed_max()),
        NormalizationSpec::Fixed { min, max } => Bounds::new(min, max),
    }
}

/// Normalize a single value against `bounds`.
///
/// The result is always in `[0, 1]`; the bounds themselves map exactly to
/// 0 and 1.
pub fn normalize_value(value: f64, bounds: Bounds) -> f64 {
    if bounds.is_degenerate() {
        return DEGENERATE_VALUE;
    }
    let clamped = value.max(bounds.min).min(bounds.max);
    let t = (clamped - bounds.min) / bounds.span();
    if t.is_nan() {
        DEGENERATE_VALUE
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// A grid of normalized values, row-major like its source.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrid {
    width: u32,
    height: u32,
    values: Vec<f64>,
    bounds: Bounds,
    degenerate: bool,
}

impl NormalizedGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True when the range had zero width and every value is the midpoint.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalize every sample of `grid` into `[0, 1]`.
pub fn normalize(grid: &ScalarGrid, spec: &NormalizationSpec) -> NormalizedGrid {
    let bounds = resolve_bounds(grid, spec);
    let degenerate = bounds.is_degenerate();

    let values = if degenerate {
        warn!(
            min = bounds.min,
            max = bounds.max,
            spec = %spec,
            width = grid.width(),
            height = grid.height(),
            "Degenerate normalization range, rendering neutral field"
        );
        metrics::counter!("normalize_degenerate_range_total").increment(1);
        vec![DEGENERATE_VALUE; grid.len()]
    } else {
        grid.values()
            .iter()
            .map(|&v| normalize_value(v, bounds))
            .collect()
    };

    NormalizedGrid {
        width: grid.width(),
        height: grid.height(),
        values,
        bounds,
        degenerate,
    }
}
