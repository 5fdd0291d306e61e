//! Test data generators for magnetogram-like grids.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

/// Creates a test grid with predictable values.
///
/// Each cell value is `col * 1000 + row`, so `grid[row * width + col]`
/// can be checked against its position after a round trip.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Creates a synoptic radial-field map resembling a solar dipole.
///
/// Rows run from the north pole (row 0) to the south pole, so the field is
/// `peak * cos(colatitude)`: positive in the north, negative in the south,
/// zero at the equator. A small longitudinal ripple keeps rows distinct.
pub fn create_dipole_magnetogram(width: usize, height: usize, peak: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        let colatitude = std::f64::consts::PI * (row as f64 + 0.5) / height as f64;
        for col in 0..width {
            let longitude = 2.0 * std::f64::consts::PI * col as f64 / width as f64;
            let ripple = 0.05 * peak * (3.0 * longitude).sin() * colatitude.sin();
            data.push(peak * colatitude.cos() + ripple);
        }
    }
    data
}

/// Creates a grid with every value equal to `value`.
pub fn create_flat_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a linear ramp from `min` to `max` across the whole grid in
/// row-major order.
pub fn create_ramp_grid(width: usize, height: usize, min: f64, max: f64) -> Vec<f64> {
    let n = width * height;
    if n <= 1 {
        return vec![min; n];
    }
    (0..n)
        .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
        .collect()
}
