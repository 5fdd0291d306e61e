//! Immutable scalar grids decoded from magnetogram images.

use crate::GridError;

/// A 2-D field of samples in row-major order, with its observed value range.
///
/// Grids are immutable once built and are typically shared behind an
/// `Arc` between the normalizer, both render paths and the transition
/// controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    width: u32,
    height: u32,
    values: Vec<f64>,
    observed_min: f64,
    observed_max: f64,
}

impl ScalarGrid {
    /// Build a grid from raw samples.
    ///
    /// Non-finite samples are replaced with `0.0` before the observed range
    /// is computed.
    pub fn new(width: u32, height: u32, mut values: Vec<f64>) -> Result<Self, GridError> {
        check_shape(width, height, values.len())?;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.iter_mut() {
            if !v.is_finite() {
                *v = 0.0;
            }
            min = min.min(*v);
            max = max.max(*v);
        }

        Ok(Self {
            width,
            height,
            values,
            observed_min: min,
            observed_max: max,
        })
    }

    /// Build a grid whose range was already tracked by the producer.
    ///
    /// Used by decoders that compute min/max in the same pass as decoding.
    /// All samples must be finite and lie within `[min, max]`; only the
    /// bounds themselves are checked here.
    pub fn with_range(
        width: u32,
        height: u32,
        values: Vec<f64>,
        observed_min: f64,
        observed_max: f64,
    ) -> Result<Self, GridError> {
        check_shape(width, height, values.len())?;
        let finite = observed_min.is_finite() && observed_max.is_finite();
        if !finite || observed_min > observed_max {
            return Err(GridError::InvalidRange);
        }
        debug_assert!(values.iter().all(|v| v.is_finite()));

        Ok(Self {
            width,
            height,
            values,
            observed_min,
            observed_max,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major samples.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn observed_min(&self) -> f64 {
        self.observed_min
    }

    pub fn observed_max(&self) -> f64 {
        self.observed_max
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty grids cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Whether `other` has the same dimensions, so the two can be blended.
    pub fn same_shape(&self, other: &ScalarGrid) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Consume the grid and return its samples.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

fn check_shape(width: u32, height: u32, len: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::Empty);
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .unwrap_or(usize::MAX);
    if len != expected {
        return Err(GridError::LengthMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}
