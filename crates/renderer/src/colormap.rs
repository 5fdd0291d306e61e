//! Diverging polarity colormap.
//!
//! Normalized field strength runs from strong negative polarity (0.0,
//! warm red/orange) through a neutral gray band around 0.5 to strong
//! positive polarity (1.0, green/blue). Adjacent bands meet at the same
//! color, so the ramp has no visible seams.

/// Band boundaries in normalized units.
pub const BAND_EDGES: [f64; 4] = [0.40, 0.48, 0.52, 0.60];

/// Color of the neutral band.
pub const NEUTRAL: (u8, u8, u8) = (150, 150, 150);

/// Map a normalized value to an RGB color.
///
/// Inputs outside `[0, 1]` are clamped; NaN renders as the neutral tone.
pub fn color_for(t: f64) -> (u8, u8, u8) {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };

    let (r, g, b) = match t {
        t if t < 0.40 => {
            let s = t / 0.40;
            (100.0 + 155.0 * s, 200.0 * s, 0.0)
        }
        t if t < 0.48 => {
            let s = (t - 0.40) / 0.08;
            (255.0 - 105.0 * s, 200.0 - 50.0 * s, 150.0 * s)
        }
        t if t < 0.52 => return NEUTRAL,
        t if t < 0.60 => {
            let s = (t - 0.52) / 0.08;
            (150.0 - 150.0 * s, 150.0 + 105.0 * s, 150.0 - 50.0 * s)
        }
        t => {
            let s = (t - 0.60) / 0.40;
            (0.0, 255.0 - 255.0 * s, 100.0 + 155.0 * s)
        }
    };

    (channel(r), channel(g), channel(b))
}

fn channel(v: f64) -> u8 {
    v.floor().clamp(0.0, 255.0) as u8
}
