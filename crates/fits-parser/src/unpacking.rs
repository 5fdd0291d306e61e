//! Typed payload decoding.
//!
//! FITS stores samples big-endian with a fixed width selected by `BITPIX`:
//! - `8`: unsigned byte
//! - `16` / `32`: two's-complement signed integers
//! - `-32` / `-64`: IEEE 754 floats

use crate::FitsError;

/// Sample encoding of the data unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    U8,
    I16,
    I32,
    F32,
    F64,
}

impl SampleEncoding {
    /// Map a `BITPIX` value onto an encoding.
    pub fn from_bitpix(bitpix: i64) -> Result<Self, FitsError> {
        match bitpix {
            8 => Ok(Self::U8),
            16 => Ok(Self::I16),
            32 => Ok(Self::I32),
            -32 => Ok(Self::F32),
            -64 => Ok(Self::F64),
            other => Err(FitsError::UnsupportedEncoding(other)),
        }
    }

    pub fn bitpix(&self) -> i64 {
        match self {
            Self::U8 => 8,
            Self::I16 => 16,
            Self::I32 => 32,
            Self::F32 => -32,
            Self::F64 => -64,
        }
    }

    /// `|BITPIX| / 8`
    pub fn bytes_per_sample(&self) -> usize {
        (self.bitpix().unsigned_abs() / 8) as usize
    }

    /// Read one big-endian sample. `b` must be `bytes_per_sample()` long.
    #[inline]
    fn read(&self, b: &[u8]) -> f64 {
        match self {
            Self::U8 => b[0] as f64,
            Self::I16 => i16::from_be_bytes([b[0], b[1]]) as f64,
            Self::I32 => i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
            Self::F32 => f32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
            Self::F64 => f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        }
    }
}

/// Decoded samples together with the statistics gathered while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Unpacked {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
    /// Samples that were NaN/Inf and replaced with 0.
    pub non_finite: usize,
}

/// Decode `count` samples from `payload` in a single pass.
///
/// Physical value = `bzero + bscale * raw`. Non-finite results become `0.0`.
pub fn unpack_samples(
    payload: &[u8],
    count: usize,
    encoding: SampleEncoding,
    bscale: f64,
    bzero: f64,
) -> Result<Unpacked, FitsError> {
    let width = encoding.bytes_per_sample();
    let expected = count.checked_mul(width).unwrap_or(usize::MAX);
    if payload.len() < expected {
        return Err(FitsError::TruncatedPayload {
            expected,
            available: payload.len(),
        });
    }

    let mut values = Vec::with_capacity(count);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut non_finite = 0;

    for chunk in payload[..expected].chunks_exact(width) {
        let mut value = bzero + bscale * encoding.read(chunk);
        if !value.is_finite() {
            value = 0.0;
            non_finite += 1;
        }
        min = min.min(value);
        max = max.max(value);
        values.push(value);
    }

    Ok(Unpacked {
        values,
        min,
        max,
        non_finite,
    })
}
