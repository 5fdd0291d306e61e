//! Integration tests for FITS decoding.
//!
//! Inputs are synthesized with `test_utils::FitsBuilder`, so these tests run
//! without any archive downloads.

use fits_parser::{decode, decode_with_report, parse_header, FitsError, SampleEncoding, BLOCK_SIZE};
use test_utils::{create_dipole_magnetogram, create_test_grid, require_test_file, FitsBuilder};

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_float32_2x2() {
    let bytes = FitsBuilder::new(2, 2, -32)
        .values(&[-100.0, 0.0, 50.0, 100.0])
        .build();

    let grid = decode(&bytes).unwrap();

    assert_eq!(grid.width(), 2);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.values(), &[-100.0, 0.0, 50.0, 100.0]);
    assert_eq!(grid.observed_min(), -100.0);
    assert_eq!(grid.observed_max(), 100.0);
}

#[test]
fn test_every_bitpix_width() {
    let values = [0.0, 1.0, 100.0, 127.0, 42.0, 7.0];
    for bitpix in [8, 16, 32, -32, -64] {
        let bytes = FitsBuilder::new(3, 2, bitpix).values(&values).build();
        let grid = decode(&bytes).unwrap_or_else(|e| panic!("BITPIX {}: {}", bitpix, e));
        assert_eq!(grid.values(), &values, "BITPIX {}", bitpix);
        assert_eq!(grid.observed_min(), 0.0);
        assert_eq!(grid.observed_max(), 127.0);
    }
}

#[test]
fn test_negative_integers_are_sign_extended() {
    let values = [-32768.0, -1.0, 1.0, 32767.0];
    let grid = decode(&FitsBuilder::new(4, 1, 16).values(&values).build()).unwrap();
    assert_eq!(grid.values(), &values);

    let values = [-2_000_000.0, 2_000_000.0];
    let grid = decode(&FitsBuilder::new(2, 1, 32).values(&values).build()).unwrap();
    assert_eq!(grid.values(), &values);
}

#[test]
fn test_row_major_order_preserved() {
    let values = create_test_grid(5, 4);
    let grid = decode(&FitsBuilder::new(5, 4, -64).values(&values).build()).unwrap();
    // col=3, row=2 -> 3002
    assert_eq!(grid.get(3, 2), Some(3002.0));
    assert_eq!(grid.values(), values.as_slice());
}

#[test]
fn test_dipole_magnetogram_range() {
    let values = create_dipole_magnetogram(36, 18, 250.0);
    let grid = decode(&FitsBuilder::new(36, 18, -64).values(&values).build()).unwrap();
    let expected_max = values.iter().cloned().fold(f64::MIN, f64::max);
    let expected_min = values.iter().cloned().fold(f64::MAX, f64::min);
    assert_eq!(grid.observed_max(), expected_max);
    assert_eq!(grid.observed_min(), expected_min);
}

// ============================================================================
// Header handling
// ============================================================================

#[test]
fn test_multi_block_header() {
    let mut builder = FitsBuilder::new(2, 1, -32).values(&[3.0, -4.0]);
    for i in 0..50 {
        builder = builder.comment(&format!("history line {}", i));
    }
    let bytes = builder.build();

    let header = parse_header(&bytes).unwrap();
    assert_eq!(header.data_offset, 2 * BLOCK_SIZE);

    let grid = decode(&bytes).unwrap();
    assert_eq!(grid.values(), &[3.0, -4.0]);
}

#[test]
fn test_header_keywords_exposed() {
    let bytes = FitsBuilder::new(2, 1, -32)
        .card("CAR_ROT", "2240")
        .card("TELESCOP", "'SDO/HMI'")
        .values(&[0.0, 0.0])
        .build();

    let image = decode_with_report(&bytes).unwrap();
    assert_eq!(image.header.get("CAR_ROT"), Some("2240"));
    assert_eq!(image.header.get("TELESCOP"), Some("SDO/HMI"));
    assert_eq!(image.header.encoding, SampleEncoding::F32);
    assert!(!image.header.is_scaled());
}

#[test]
fn test_bscale_bzero_applied() {
    let bytes = FitsBuilder::new(3, 1, 16)
        .card("BSCALE", "0.1")
        .card("BZERO", "-5.0")
        .values(&[0.0, 50.0, 100.0])
        .build();

    let grid = decode(&bytes).unwrap();
    let expected = [-5.0, 0.0, 5.0];
    for (got, want) in grid.values().iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
    }
    assert!((grid.observed_min() + 5.0).abs() < 1e-9);
    assert!((grid.observed_max() - 5.0).abs() < 1e-9);
}

#[test]
fn test_fortran_exponent_in_bscale() {
    let bytes = FitsBuilder::new(1, 1, 8)
        .card("BSCALE", "2.0D+00")
        .values(&[21.0])
        .build();
    assert_eq!(decode(&bytes).unwrap().values(), &[42.0]);
}

// ============================================================================
// Non-finite samples
// ============================================================================

#[test]
fn test_non_finite_samples_become_zero() {
    let bytes = FitsBuilder::new(4, 1, -32)
        .values(&[f64::NAN, 10.0, f64::INFINITY, -3.0])
        .build();

    let image = decode_with_report(&bytes).unwrap();
    assert_eq!(image.grid.values(), &[0.0, 10.0, 0.0, -3.0]);
    assert_eq!(image.non_finite, 2);
    assert_eq!(image.grid.observed_min(), -3.0);
    assert_eq!(image.grid.observed_max(), 10.0);
}

#[test]
fn test_all_nan_grid_is_flat_zero() {
    let bytes = FitsBuilder::new(2, 2, -64)
        .values(&[f64::NAN; 4])
        .build();
    let grid = decode(&bytes).unwrap();
    assert_eq!(grid.observed_min(), 0.0);
    assert_eq!(grid.observed_max(), 0.0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_naxis1() {
    let bytes = FitsBuilder::new(2, 2, -32)
        .omit("NAXIS1")
        .values(&[0.0; 4])
        .build();
    assert_eq!(
        decode(&bytes).unwrap_err(),
        FitsError::MissingDimension("NAXIS1".to_string())
    );
}

#[test]
fn test_missing_naxis2() {
    let bytes = FitsBuilder::new(2, 2, -32).omit("NAXIS2").build();
    assert_eq!(
        decode(&bytes).unwrap_err(),
        FitsError::MissingDimension("NAXIS2".to_string())
    );
}

#[test]
fn test_non_positive_dimension() {
    let bytes = FitsBuilder::new(0, 2, -32).build();
    assert!(matches!(
        decode(&bytes).unwrap_err(),
        FitsError::MissingDimension(_)
    ));

    let bytes = FitsBuilder::new(2, -1, -32).build();
    assert!(matches!(
        decode(&bytes).unwrap_err(),
        FitsError::MissingDimension(_)
    ));
}

#[test]
fn test_unsupported_encoding() {
    let bytes = FitsBuilder::new(1, 1, 64).raw_payload(vec![0; 8]).build();
    let err = decode(&bytes).unwrap_err();
    assert_eq!(err, FitsError::UnsupportedEncoding(64));
    assert_eq!(err.code(), "UnsupportedEncoding");
}

#[test]
fn test_missing_bitpix() {
    let bytes = FitsBuilder::new(1, 1, -32).omit("BITPIX").build();
    assert_eq!(
        decode(&bytes).unwrap_err(),
        FitsError::MissingKeyword("BITPIX".to_string())
    );
}

#[test]
fn test_three_axis_image_rejected() {
    let bytes = FitsBuilder::new(2, 2, -32).naxis(Some(3)).build();
    assert_eq!(decode(&bytes).unwrap_err(), FitsError::UnsupportedAxisCount(3));
}

#[test]
fn test_missing_naxis_card_is_tolerated() {
    let bytes = FitsBuilder::new(1, 1, 8).naxis(None).values(&[9.0]).build();
    assert_eq!(decode(&bytes).unwrap().values(), &[9.0]);
}

#[test]
fn test_truncated_payload() {
    let full = FitsBuilder::new(4, 4, -32)
        .values(&[1.0; 16])
        .unpadded()
        .build();
    let cut = &full[..full.len() - 3];

    let err = decode(cut).unwrap_err();
    assert_eq!(
        err,
        FitsError::TruncatedPayload {
            expected: 64,
            available: 61
        }
    );
}

#[test]
fn test_header_only_file_is_truncated_payload() {
    let bytes = FitsBuilder::new(2, 2, -32).build();
    assert!(matches!(
        decode(&bytes).unwrap_err(),
        FitsError::TruncatedPayload { available: 0, .. }
    ));
}

#[test]
fn test_huge_dimensions_rejected_without_allocating() {
    // 2^31 x 2^31 samples: the byte count overflows usize at 4 and 8 bytes
    // per sample.
    for bitpix in [-64, 32] {
        let bytes = FitsBuilder::new(1 << 31, 1 << 31, bitpix)
            .raw_payload(vec![0; 64])
            .build();
        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            FitsError::TruncatedPayload {
                expected: usize::MAX,
                available: BLOCK_SIZE
            },
            "BITPIX {}",
            bitpix
        );
        assert_eq!(err.code(), "TruncatedPayload");
    }
}

#[test]
fn test_huge_byte_image_is_truncated_payload() {
    let bytes = FitsBuilder::new(1 << 31, 1 << 31, 8)
        .raw_payload(vec![0; 64])
        .build();
    assert!(matches!(
        decode(&bytes).unwrap_err(),
        FitsError::TruncatedPayload {
            available: BLOCK_SIZE,
            ..
        }
    ));
}

#[test]
fn test_max_u32_dimensions_rejected() {
    let bytes = FitsBuilder::new(u32::MAX as i64, u32::MAX as i64, -32).build();
    assert!(matches!(
        decode(&bytes).unwrap_err(),
        FitsError::TruncatedPayload { available: 0, .. }
    ));
}

#[test]
fn test_missing_end_card() {
    let bytes = FitsBuilder::new(1, 1, 8).without_end().build();
    assert_eq!(decode(&bytes).unwrap_err(), FitsError::TruncatedHeader);
    assert_eq!(decode(&[]).unwrap_err(), FitsError::TruncatedHeader);
}

#[test]
fn test_garbage_dimension_value() {
    let bytes = FitsBuilder::new(1, 1, -32)
        .omit("NAXIS1")
        .card("NAXIS1", "'wide'")
        .build();
    assert_eq!(
        decode(&bytes).unwrap_err(),
        FitsError::MissingDimension("NAXIS1".to_string())
    );
}

#[test]
fn test_error_converts_to_solar_error() {
    let err: solar_common::SolarError = FitsError::TruncatedHeader.into();
    assert_eq!(err.code(), "InvalidMagnetogram");
}

// ============================================================================
// Real archive data (skipped when absent)
// ============================================================================

#[test]
fn test_real_synoptic_magnetogram() {
    let path = require_test_file!("hmi.Synoptic_Mr_small.2240.fits");
    let bytes = std::fs::read(path).unwrap();

    let image = decode_with_report(&bytes).unwrap();
    assert!(image.grid.width() > image.grid.height());
    assert!(image.grid.observed_min() < 0.0);
    assert!(image.grid.observed_max() > 0.0);
}
