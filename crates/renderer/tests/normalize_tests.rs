//! Tests for field normalization.

use renderer::{normalize, normalize_value, resolve_bounds, Bounds, NormalizationSpec};
use solar_common::ScalarGrid;
use test_utils::{assert_approx_eq, create_dipole_magnetogram, create_flat_grid, create_ramp_grid};

fn grid(width: u32, height: u32, values: Vec<f64>) -> ScalarGrid {
    ScalarGrid::new(width, height, values).unwrap()
}

#[test]
fn test_auto_uses_observed_range() {
    let g = grid(4, 1, vec![-100.0, 0.0, 50.0, 100.0]);
    let n = normalize(&g, &NormalizationSpec::Auto);

    assert_eq!(n.values(), &[0.0, 0.5, 0.75, 1.0]);
    assert_eq!(n.bounds(), Bounds { min: -100.0, max: 100.0 });
    assert!(!n.is_degenerate());
}

#[test]
fn test_output_always_in_unit_interval() {
    let g = grid(36, 18, create_dipole_magnetogram(36, 18, 1800.0));
    for spec in [
        NormalizationSpec::Auto,
        NormalizationSpec::fixed(-500.0, 500.0),
        NormalizationSpec::fixed(100.0, 200.0),
    ] {
        let n = normalize(&g, &spec);
        assert_eq!(n.len(), g.len());
        assert!(n.values().iter().all(|v| (0.0..=1.0).contains(v)), "{}", spec);
    }
}

#[test]
fn test_auto_hits_both_endpoints() {
    let g = grid(5, 5, create_ramp_grid(5, 5, -20.0, 80.0));
    let n = normalize(&g, &NormalizationSpec::Auto);
    assert_eq!(n.values()[0], 0.0);
    assert_eq!(n.values()[24], 1.0);
}

#[test]
fn test_fixed_bounds_clamp_outliers() {
    let g = grid(3, 1, vec![-3000.0, 0.0, 3000.0]);
    let n = normalize(&g, &NormalizationSpec::fixed(-1500.0, 1500.0));
    assert_eq!(n.values(), &[0.0, 0.5, 1.0]);
}

#[test]
fn test_fixed_bounds_are_monotone() {
    let g = grid(9, 1, create_ramp_grid(9, 1, -40.0, 40.0));
    let n = normalize(&g, &NormalizationSpec::fixed(-25.0, 25.0));
    for pair in n.values().windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn test_degenerate_range_is_flat_midpoint() {
    let g = grid(3, 2, create_flat_grid(3, 2, 42.0));
    let n = normalize(&g, &NormalizationSpec::Auto);

    assert!(n.is_degenerate());
    assert!(n.values().iter().all(|&v| v == 0.5));
    assert!(n.values().iter().all(|v| !v.is_nan()));
}

#[test]
fn test_degenerate_fixed_range() {
    let g = grid(2, 1, vec![1.0, 2.0]);
    let n = normalize(&g, &NormalizationSpec::fixed(5.0, 5.0));
    assert!(n.is_degenerate());
    assert_eq!(n.values(), &[0.5, 0.5]);
}

#[test]
fn test_reversed_fixed_bounds_match_ordered() {
    let g = grid(4, 1, vec![-10.0, -2.0, 3.0, 10.0]);
    let ordered = normalize(&g, &NormalizationSpec::fixed(-10.0, 10.0));
    let reversed = normalize(&g, &NormalizationSpec::fixed(10.0, -10.0));
    assert_eq!(ordered.values(), reversed.values());
}

#[test]
fn test_normalize_value_agrees_with_grid() {
    let g = grid(36, 18, create_dipole_magnetogram(36, 18, 250.0));
    let spec = NormalizationSpec::Auto;
    let bounds = resolve_bounds(&g, &spec);
    let n = normalize(&g, &spec);
    for (raw, norm) in g.values().iter().zip(n.values()) {
        assert_approx_eq!(normalize_value(*raw, bounds), *norm, 0.0);
    }
}

#[test]
fn test_spec_serde_shape() {
    let json = serde_json::to_value(NormalizationSpec::fixed(-1.0, 1.0)).unwrap();
    assert_eq!(json["mode"], "fixed");
    assert_eq!(json["min"], -1.0);

    let auto: NormalizationSpec = serde_json::from_str(r#"{"mode":"auto"}"#).unwrap();
    assert_eq!(auto, NormalizationSpec::Auto);
}
