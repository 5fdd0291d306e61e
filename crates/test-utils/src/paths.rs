//! Locating optional archive files for tests.
//!
//! Real synoptic magnetograms and coronal models are not committed. Tests
//! that want one look it up here and skip when it is absent.

use std::path::PathBuf;

/// Environment variable naming an extra directory of archive files.
pub const TEST_DATA_ENV: &str = "TEST_DATA_DIR";

/// The workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or(manifest_dir)
}

/// Directories searched by [`find_test_file`], in priority order.
pub fn test_data_dirs() -> Vec<PathBuf> {
    let root = workspace_root();
    let mut dirs: Vec<PathBuf> = std::env::var_os(TEST_DATA_ENV)
        .map(PathBuf::from)
        .into_iter()
        .collect();
    dirs.push(root.join("testdata"));
    dirs.push(root.join("data").join("archive"));
    dirs
}

/// First existing `name` under [`test_data_dirs`].
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    test_data_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// A scratch output directory, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("solar_frames_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}
