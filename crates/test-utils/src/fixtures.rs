//! Common test fixtures for coronal datasets and archive directories.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::fits::magnetogram_fits;

/// A representative Carrington rotation used throughout the tests.
pub const SAMPLE_ROTATION: u32 = 2240;

/// A field line in the coronal JSON wire format.
pub fn field_line_json(points: &[[f64; 3]], strengths: &[f64], polarity: &str) -> Value {
    json!({
        "points": points,
        "strengths": strengths,
        "polarity": polarity,
    })
}

/// A coronal dataset document wrapping the given lines.
pub fn coronal_json(lmax: u32, r_source: f64, lines: Vec<Value>) -> Value {
    json!({
        "metadata": {
            "lmax": lmax,
            "r_source": r_source,
            "n_field_lines": lines.len(),
        },
        "fieldLines": lines,
    })
}

/// Dataset with one degenerate single-point line and one valid 3-point line.
pub fn coronal_with_degenerate_line() -> Value {
    coronal_json(
        30,
        2.5,
        vec![
            field_line_json(&[[1.0, 0.0, 0.0]], &[12.0], "closed"),
            field_line_json(
                &[[1.0, 0.0, 0.0], [1.5, 0.1, 0.0], [2.0, 0.2, 0.1]],
                &[10.0, 6.0, 2.5],
                "open",
            ),
        ],
    )
}

/// A small, fully valid dataset: two open lines and one closed loop.
pub fn sample_coronal() -> Value {
    coronal_json(
        30,
        2.5,
        vec![
            field_line_json(
                &[[1.0, 0.0, 0.0], [1.5, 0.0, 0.0], [2.5, 0.0, 0.0]],
                &[8.0, 4.0, 1.0],
                "open",
            ),
            field_line_json(
                &[[0.0, 1.0, 0.0], [0.0, 2.0, 0.0], [0.0, 2.5, 0.0]],
                &[6.0, 3.0, 1.5],
                "open",
            ),
            field_line_json(
                &[[0.0, 0.0, 1.0], [0.0, 0.3, 1.2], [0.0, 0.6, 1.0]],
                &[20.0, 15.0, 20.0],
                "closed",
            ),
        ],
    )
}

/// File name the archive uses for a rotation's magnetogram.
pub fn magnetogram_file_name(rotation: u32) -> String {
    format!("hmi.Synoptic_Mr_small.{}.fits", rotation)
}

/// File name the archive uses for a rotation's coronal model.
pub fn coronal_file_name(rotation: u32) -> String {
    format!("cr{}_coronal.json", rotation)
}

/// A throwaway archive directory laid out like the real one.
pub struct TempArchive {
    dir: tempfile::TempDir,
}

impl TempArchive {
    pub fn new() -> Self {
        Self {
            dir: tempfile::Builder::new()
                .prefix("solar_archive_")
                .tempdir()
                .expect("Failed to create temporary archive directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a `BITPIX = -32` magnetogram for `rotation`.
    pub fn add_magnetogram(
        &self,
        rotation: u32,
        width: u32,
        height: u32,
        values: &[f64],
    ) -> PathBuf {
        let path = self.path().join(magnetogram_file_name(rotation));
        std::fs::write(&path, magnetogram_fits(width, height, values))
            .expect("Failed to write magnetogram fixture");
        path
    }

    /// Write a coronal model document for `rotation`.
    pub fn add_coronal(&self, rotation: u32, document: &Value) -> PathBuf {
        let path = self.path().join(coronal_file_name(rotation));
        std::fs::write(&path, document.to_string()).expect("Failed to write coronal fixture");
        path
    }

    /// Write arbitrary bytes under `name`.
    pub fn add_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write archive fixture");
        path
    }
}

impl Default for TempArchive {
    fn default() -> Self {
        Self::new()
    }
}
