//! Coordinate helpers for field-line geometry.
//!
//! Positions are Cartesian in units of solar radii, with the Sun's center
//! at the origin.

/// Convert spherical coordinates to Cartesian `[x, y, z]`.
///
/// `theta` is colatitude and `phi` longitude, both in radians.
pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> [f64; 3] {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    [r * sin_theta * cos_phi, r * sin_theta * sin_phi, r * cos_theta]
}

/// Euclidean distance between two points.
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance from the Sun's center.
pub fn radius(p: &[f64; 3]) -> f64 {
    distance(&[0.0; 3], p)
}
