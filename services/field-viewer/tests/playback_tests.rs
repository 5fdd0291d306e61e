//! End-to-end tests: archive to PNG frames.

use std::time::Duration;

use field_viewer::playback::playback_normalization;
use field_viewer::{
    load_magnetogram, play_transition, render_map, render_texture, LocalArchive, Pacing,
    PlaybackOptions,
};
use renderer::NormalizationSpec;
use solar_common::{CarringtonRotation, ScalarGrid};
use test_utils::{create_dipole_magnetogram, create_flat_grid, temp_test_dir, TempArchive};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

fn cr(n: u32) -> CarringtonRotation {
    CarringtonRotation::new(n).unwrap()
}

fn two_rotation_archive() -> TempArchive {
    let archive = TempArchive::new();
    archive.add_magnetogram(2240, 16, 8, &create_dipole_magnetogram(16, 8, 300.0));
    archive.add_magnetogram(2241, 16, 8, &create_dipole_magnetogram(16, 8, -450.0));
    archive
}

fn options(duration_ms: u64, frame_ms: u64) -> PlaybackOptions {
    PlaybackOptions {
        duration: Duration::from_millis(duration_ms),
        frame_interval: Duration::from_millis(frame_ms),
        normalization: NormalizationSpec::Auto,
        pacing: Pacing::Simulated,
    }
}

// ============================================================================
// Single rotation export
// ============================================================================

#[tokio::test]
async fn test_render_map_and_texture() {
    let archive = two_rotation_archive();
    let out = temp_test_dir();
    let local = LocalArchive::open(archive.path()).unwrap();
    let image = load_magnetogram(&local, cr(2240)).await.unwrap();

    let map = render_map(&image.grid, &NormalizationSpec::Auto, cr(2240), out.path())
        .await
        .unwrap();
    assert!(map.ends_with("cr2240_map.png"));
    assert_eq!(&std::fs::read(&map).unwrap()[..8], &PNG_SIGNATURE);

    let texture = render_texture(&image.grid, &NormalizationSpec::Auto, cr(2240), out.path())
        .await
        .unwrap();
    assert!(texture.ends_with("cr2240_texture.png"));
    // Color type byte in IHDR: RGB.
    assert_eq!(std::fs::read(&texture).unwrap()[25], 2);
}

#[tokio::test]
async fn test_render_flat_field_succeeds() {
    let out = temp_test_dir();
    let grid = ScalarGrid::new(4, 4, create_flat_grid(4, 4, 12.0)).unwrap();
    let path = render_map(&grid, &NormalizationSpec::Auto, cr(2100), out.path())
        .await
        .unwrap();
    assert!(path.exists());
}

// ============================================================================
// Crossfade playback
// ============================================================================

#[tokio::test]
async fn test_simulated_playback_frame_sequence() {
    let archive = two_rotation_archive();
    let out = temp_test_dir();
    let local = LocalArchive::open(archive.path()).unwrap();

    let report = play_transition(&local, cr(2240), cr(2241), &options(1000, 100), out.path())
        .await
        .unwrap();

    // Frames at 0, 100, ..., 1000 ms.
    assert_eq!(report.frames.len(), 11);
    assert_eq!(report.weights[0], 0.0);
    assert_eq!(*report.weights.last().unwrap(), 1.0);
    for pair in report.weights.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert!(report.frames[0].ends_with("cr2240_cr2241_0000.png"));
    assert!(report.frames.iter().all(|p| p.exists()));
}

#[tokio::test]
async fn test_zero_duration_playback_is_one_frame() {
    let archive = two_rotation_archive();
    let out = temp_test_dir();
    let local = LocalArchive::open(archive.path()).unwrap();

    let report = play_transition(&local, cr(2240), cr(2241), &options(0, 33), out.path())
        .await
        .unwrap();
    assert_eq!(report.frames.len(), 1);
    assert_eq!(report.weights, vec![1.0]);
}

#[tokio::test]
async fn test_realtime_playback_completes() {
    let archive = two_rotation_archive();
    let out = temp_test_dir();
    let local = LocalArchive::open(archive.path()).unwrap();

    let mut opts = options(60, 20);
    opts.pacing = Pacing::Realtime;
    let report = play_transition(&local, cr(2240), cr(2241), &opts, out.path())
        .await
        .unwrap();
    assert!(report.frames.len() >= 2);
    assert_eq!(*report.weights.last().unwrap(), 1.0);
}

#[tokio::test]
async fn test_mismatched_rotations_rejected() {
    let archive = TempArchive::new();
    archive.add_magnetogram(2240, 16, 8, &create_dipole_magnetogram(16, 8, 300.0));
    archive.add_magnetogram(2241, 8, 4, &create_dipole_magnetogram(8, 4, 300.0));
    let out = temp_test_dir();
    let local = LocalArchive::open(archive.path()).unwrap();

    let err = play_transition(&local, cr(2240), cr(2241), &options(100, 10), out.path())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "TransitionRejected");
}

#[test]
fn test_playback_normalization_spans_both_grids() {
    let a = ScalarGrid::new(2, 1, vec![-10.0, 5.0]).unwrap();
    let b = ScalarGrid::new(2, 1, vec![-3.0, 40.0]).unwrap();

    assert_eq!(
        playback_normalization(&a, &b, &NormalizationSpec::Auto),
        NormalizationSpec::fixed(-10.0, 40.0)
    );
    let fixed = NormalizationSpec::fixed(-1.0, 1.0);
    assert_eq!(playback_normalization(&a, &b, &fixed), fixed);
}
