//! Image rendering for magnetogram visualization.
//!
//! The pipeline is split into independent stages:
//! - Normalization of raw field values into `[0, 1]`
//! - The diverging polarity colormap
//! - Pixel buffer rendering (RGB texture and RGBA map paths)
//! - PNG encoding for exported frames

pub mod colormap;
pub mod gradient;
pub mod normalize;
pub mod png;

pub use colormap::{color_for, BAND_EDGES, NEUTRAL};
pub use gradient::{colorize, legend, render_rgb, render_rgba, Colorized};
pub use normalize::{
    normalize, normalize_value, resolve_bounds, Bounds, NormalizationSpec, NormalizedGrid,
};
pub use png::{create_png, create_png_rgb};
