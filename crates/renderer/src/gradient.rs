//! Pixel buffer rendering for normalized magnetograms.
//!
//! Both the globe texture (RGB) and the flat map (RGBA) are filled from
//! [`color_for`], so the two views always agree pixel for pixel.

use rayon::prelude::*;
use solar_common::ScalarGrid;

use crate::colormap::color_for;
use crate::normalize::{normalize, Bounds, NormalizationSpec, NormalizedGrid};

/// Grids with at least this many samples are colorized on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Rows handed to each rayon task.
const ROWS_PER_CHUNK: usize = 16;

/// Render a normalized grid as tightly packed RGB (3 bytes per pixel).
pub fn render_rgb(grid: &NormalizedGrid) -> Vec<u8> {
    render_pixels(grid.values(), grid.width() as usize, 3)
}

/// Render a normalized grid as opaque RGBA (4 bytes per pixel).
pub fn render_rgba(grid: &NormalizedGrid) -> Vec<u8> {
    render_pixels(grid.values(), grid.width() as usize, 4)
}

fn render_pixels(values: &[f64], width: usize, channels: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; values.len() * channels];
    if values.is_empty() {
        return pixels;
    }

    if values.len() >= PARALLEL_THRESHOLD && width > 0 {
        let chunk = width * ROWS_PER_CHUNK;
        pixels
            .par_chunks_mut(chunk * channels)
            .zip(values.par_chunks(chunk))
            .for_each(|(out, rows)| fill(rows, out, channels));
    } else {
        fill(values, &mut pixels, channels);
    }

    pixels
}

fn fill(values: &[f64], out: &mut [u8], channels: usize) {
    for (pixel, &t) in out.chunks_exact_mut(channels).zip(values) {
        let (r, g, b) = color_for(t);
        pixel[0] = r;
        pixel[1] = g;
        pixel[2] = b;
        if channels == 4 {
            pixel[3] = 255;
        }
    }
}

/// A colorized grid ready for encoding.
#[derive(Debug, Clone)]
pub struct Colorized {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, row-major.
    pub pixels: Vec<u8>,
    pub bounds: Bounds,
    pub degenerate: bool,
}

/// Normalize `grid` with `spec` and render it as RGBA.
pub fn colorize(grid: &ScalarGrid, spec: &NormalizationSpec) -> Colorized {
    let normalized = normalize(grid, spec);
    Colorized {
        width: normalized.width(),
        height: normalized.height(),
        pixels: render_rgba(&normalized),
        bounds: normalized.bounds(),
        degenerate: normalized.is_degenerate(),
    }
}

/// Evenly spaced samples of the ramp from 0 to 1 for a colorbar.
pub fn legend(steps: usize) -> Vec<(f64, (u8, u8, u8))> {
    match steps {
        0 => Vec::new(),
        1 => vec![(0.5, color_for(0.5))],
        n => (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                (t, color_for(t))
            })
            .collect(),
    }
}
