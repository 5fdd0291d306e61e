//! Synthetic FITS files.
//!
//! Builds byte-exact FITS buffers (header blocks, big-endian payload,
//! padding) so decoder tests do not depend on archive downloads.

/// FITS logical record size.
pub const FITS_BLOCK: usize = 2880;

/// Format a single 80-byte value card in fixed format.
///
/// Values are right-justified to column 30 like most writers do; pass
/// string values already quoted (`"'HMI'"`).
pub fn fits_card(keyword: &str, value: &str) -> Vec<u8> {
    pad_card(format!("{:<8}= {:>20}", keyword, value))
}

/// Format a commentary card (`COMMENT`, `HISTORY`).
pub fn commentary_card(keyword: &str, text: &str) -> Vec<u8> {
    pad_card(format!("{:<8}{}", keyword, text))
}

fn pad_card(mut text: String) -> Vec<u8> {
    text.truncate(80);
    let mut raw = text.into_bytes();
    raw.resize(80, b' ');
    raw
}

/// Encode samples big-endian for a given `BITPIX`.
///
/// Panics for `BITPIX` values FITS does not define; use
/// [`FitsBuilder::raw_payload`] to write arbitrary bytes instead.
pub fn encode_samples(values: &[f64], bitpix: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * (bitpix.unsigned_abs() as usize / 8));
    for &v in values {
        match bitpix {
            8 => out.push(v as u8),
            16 => out.extend_from_slice(&(v as i16).to_be_bytes()),
            32 => out.extend_from_slice(&(v as i32).to_be_bytes()),
            -32 => out.extend_from_slice(&(v as f32).to_be_bytes()),
            -64 => out.extend_from_slice(&v.to_be_bytes()),
            other => panic!("cannot encode samples for BITPIX {}", other),
        }
    }
    out
}

#[derive(Debug, Clone)]
enum Payload {
    Values(Vec<f64>),
    Raw(Vec<u8>),
}

/// Builder for a single-HDU FITS image.
///
/// # Example
///
/// ```
/// use test_utils::FitsBuilder;
///
/// let bytes = FitsBuilder::new(2, 2, -32)
///     .values(&[-100.0, 0.0, 50.0, 100.0])
///     .build();
/// assert_eq!(bytes.len() % 2880, 0);
/// ```
#[derive(Debug, Clone)]
pub struct FitsBuilder {
    width: i64,
    height: i64,
    bitpix: i64,
    naxis: Option<i64>,
    omitted: Vec<String>,
    extra: Vec<Vec<u8>>,
    payload: Payload,
    pad_payload: bool,
    write_end: bool,
}

impl FitsBuilder {
    /// Start an image of `width` x `height` samples with the given `BITPIX`.
    pub fn new(width: i64, height: i64, bitpix: i64) -> Self {
        Self {
            width,
            height,
            bitpix,
            naxis: Some(2),
            omitted: Vec::new(),
            extra: Vec::new(),
            payload: Payload::Values(Vec::new()),
            pad_payload: true,
            write_end: true,
        }
    }

    /// Override the `NAXIS` card (`None` leaves it out).
    pub fn naxis(mut self, naxis: Option<i64>) -> Self {
        self.naxis = naxis;
        self
    }

    /// Leave a standard card (`BITPIX`, `NAXIS1`, `NAXIS2`) out.
    pub fn omit(mut self, keyword: &str) -> Self {
        self.omitted.push(keyword.to_string());
        self
    }

    /// Append a value card after the standard ones.
    pub fn card(mut self, keyword: &str, value: &str) -> Self {
        self.extra.push(fits_card(keyword, value));
        self
    }

    /// Append a `COMMENT` card.
    pub fn comment(mut self, text: &str) -> Self {
        self.extra.push(commentary_card("COMMENT", text));
        self
    }

    /// Samples to encode with this image's `BITPIX`.
    pub fn values(mut self, values: &[f64]) -> Self {
        self.payload = Payload::Values(values.to_vec());
        self
    }

    /// Payload bytes written verbatim.
    pub fn raw_payload(mut self, bytes: Vec<u8>) -> Self {
        self.payload = Payload::Raw(bytes);
        self
    }

    /// Do not pad the payload to a whole block.
    pub fn unpadded(mut self) -> Self {
        self.pad_payload = false;
        self
    }

    /// Leave out the `END` card.
    pub fn without_end(mut self) -> Self {
        self.write_end = false;
        self
    }

    /// Header blocks only.
    pub fn header_bytes(&self) -> Vec<u8> {
        let mut header = fits_card("SIMPLE", "T");
        let standard = [
            ("BITPIX", Some(self.bitpix)),
            ("NAXIS", self.naxis),
            ("NAXIS1", Some(self.width)),
            ("NAXIS2", Some(self.height)),
        ];
        for (keyword, value) in standard {
            if self.omitted.iter().any(|k| k == keyword) {
                continue;
            }
            if let Some(value) = value {
                header.extend(fits_card(keyword, &value.to_string()));
            }
        }
        for card in &self.extra {
            header.extend_from_slice(card);
        }
        if self.write_end {
            header.extend(pad_card("END".to_string()));
        }
        pad_to_block(&mut header, b' ');
        header
    }

    /// Encoded payload, padded unless [`unpadded`](Self::unpadded) was set.
    pub fn payload_bytes(&self) -> Vec<u8> {
        let mut payload = match &self.payload {
            Payload::Values(values) => encode_samples(values, self.bitpix),
            Payload::Raw(bytes) => bytes.clone(),
        };
        if self.pad_payload {
            pad_to_block(&mut payload, 0);
        }
        payload
    }

    /// Complete file.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.header_bytes();
        out.extend(self.payload_bytes());
        out
    }
}

fn pad_to_block(bytes: &mut Vec<u8>, fill: u8) {
    let rem = bytes.len() % FITS_BLOCK;
    if rem != 0 {
        bytes.resize(bytes.len() + FITS_BLOCK - rem, fill);
    }
}

/// A `BITPIX = -32` magnetogram with the given samples.
pub fn magnetogram_fits(width: u32, height: u32, values: &[f64]) -> Vec<u8> {
    FitsBuilder::new(width as i64, height as i64, -32)
        .card("TELESCOP", "'SDO/HMI'")
        .card("BUNIT", "'Mx/cm^2'")
        .values(values)
        .build()
}
