//! Shared test utilities for the solar field viewer workspace.
//!
//! - [`FitsBuilder`] synthesizes FITS magnetograms of any `BITPIX`, and can
//!   break them in controlled ways for decoder error tests
//! - magnetogram-like grid generators
//! - coronal field-line JSON fixtures and throwaway archive directories
//! - lookup of optional real archive files, with a skip macro
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fits;
pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fits::*;
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve an optional archive file, or return early from the test.
///
/// ```ignore
/// #[test]
/// fn test_real_magnetogram() {
///     let path = test_utils::require_test_file!("hmi.Synoptic_Mr_small.2240.fits");
///     let bytes = std::fs::read(path).unwrap();
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        let name: &str = $name;
        match $crate::find_test_file(name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: '{}' not found; set {} to a directory holding archive files",
                    name,
                    $crate::TEST_DATA_ENV
                );
                return;
            }
        }
    }};
}

/// Assert `|left - right| <= epsilon` for floating-point values.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        if !((left - right).abs() <= epsilon) {
            panic!(
                "assertion failed: {} ~= {}\n  left: {:?}\n right: {:?}\n   eps: {:?}",
                stringify!($left),
                stringify!($right),
                left,
                right,
                epsilon
            );
        }
    }};
}

/// Assert two RGB triplets differ by at most `tolerance` per channel.
///
/// ```ignore
/// test_utils::assert_rgb_close!((150, 150, 150), (151, 150, 149), 1);
/// ```
#[macro_export]
macro_rules! assert_rgb_close {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (l, r): ((u8, u8, u8), (u8, u8, u8)) = ($left, $right);
        let tolerance = $tolerance as u8;
        let within = l.0.abs_diff(r.0) <= tolerance
            && l.1.abs_diff(r.1) <= tolerance
            && l.2.abs_diff(r.2) <= tolerance;
        if !within {
            panic!(
                "assertion failed: colors differ by more than {}\n  left: {:?}\n right: {:?}",
                tolerance, l, r
            );
        }
    }};
}
