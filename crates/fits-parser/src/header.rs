//! FITS header parsing.
//!
//! A header is a sequence of 2880-byte blocks, each holding thirty-six
//! 80-character ASCII cards of the form `KEYWORD = value / comment`.
//! The header ends at the `END` card; the data unit starts at the next
//! block boundary.

use crate::unpacking::SampleEncoding;
use crate::FitsError;
use tracing::debug;

/// Size of a FITS logical record.
pub const BLOCK_SIZE: usize = 2880;

/// Size of a single header card.
pub const CARD_SIZE: usize = 80;

/// Cards per header block.
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// A single parsed header card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    /// Raw value text, trimmed, with string quotes removed.
    pub value: Option<String>,
    pub comment: Option<String>,
}

/// Parsed primary header of a 2-D image.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsHeader {
    /// `NAXIS1`
    pub width: u32,
    /// `NAXIS2`
    pub height: u32,
    /// Sample encoding from `BITPIX`.
    pub encoding: SampleEncoding,
    /// `BSCALE`, 1.0 when absent.
    pub bscale: f64,
    /// `BZERO`, 0.0 when absent.
    pub bzero: f64,
    /// Byte offset of the data unit from the start of the file.
    pub data_offset: usize,
    /// Every card before `END`, in file order.
    pub cards: Vec<Card>,
}

impl FitsHeader {
    /// Value of the first card with this keyword.
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|card| card.keyword == keyword)
            .and_then(|card| card.value.as_deref())
    }

    /// Number of samples in the data unit, `None` if it overflows `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Payload bytes the data unit occupies (without padding), `None` if it
    /// overflows `usize`.
    pub fn payload_len(&self) -> Option<usize> {
        self.sample_count()?
            .checked_mul(self.encoding.bytes_per_sample())
    }

    /// Whether stored values need `BZERO + BSCALE * raw` applied.
    pub fn is_scaled(&self) -> bool {
        self.bscale != 1.0 || self.bzero != 0.0
    }
}

/// Parse the primary header at the start of `data`.
pub fn parse_header(data: &[u8]) -> Result<FitsHeader, FitsError> {
    let mut cards = Vec::new();
    let mut data_offset = None;

    'blocks: for (block_index, block) in data.chunks(BLOCK_SIZE).enumerate() {
        for raw in block.chunks_exact(CARD_SIZE) {
            let card = parse_card(raw);
            if card.keyword == "END" {
                data_offset = Some((block_index + 1) * BLOCK_SIZE);
                break 'blocks;
            }
            if !card.keyword.is_empty() {
                cards.push(card);
            }
        }
    }

    let data_offset = data_offset.ok_or(FitsError::TruncatedHeader)?;

    if let Some(naxis) = optional_int(&cards, "NAXIS")? {
        if naxis != 2 {
            return Err(FitsError::UnsupportedAxisCount(naxis));
        }
    }

    let width = dimension(&cards, "NAXIS1")?;
    let height = dimension(&cards, "NAXIS2")?;

    let bitpix = optional_int(&cards, "BITPIX")?
        .ok_or_else(|| FitsError::MissingKeyword("BITPIX".to_string()))?;
    let encoding = SampleEncoding::from_bitpix(bitpix)?;

    let bscale = optional_float(&cards, "BSCALE")?.unwrap_or(1.0);
    let bzero = optional_float(&cards, "BZERO")?.unwrap_or(0.0);

    debug!(
        width,
        height,
        bitpix,
        bscale,
        bzero,
        data_offset,
        cards = cards.len(),
        "Parsed FITS header"
    );

    Ok(FitsHeader {
        width,
        height,
        encoding,
        bscale,
        bzero,
        data_offset,
        cards,
    })
}

/// Split one 80-byte card into keyword, value and comment.
pub fn parse_card(raw: &[u8]) -> Card {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end();

    // Value cards carry the indicator right after the keyword field;
    // commentary cards (COMMENT, HISTORY, blank) have no `=`.
    let Some(eq) = text.find('=').filter(|&pos| pos <= 8) else {
        let keyword = text.get(..8).unwrap_or(text).trim().to_string();
        return Card {
            keyword,
            value: None,
            comment: None,
        };
    };

    let keyword = text[..eq].trim().to_string();
    let (value, comment) = split_value(&text[eq + 1..]);

    Card {
        keyword,
        value,
        comment,
    }
}

/// Separate a value field from its trailing `/` comment.
fn split_value(field: &str) -> (Option<String>, Option<String>) {
    let field = field.trim_start();

    // Quoted strings may contain `/`; a doubled quote is an escaped quote.
    if let Some(rest) = field.strip_prefix('\'') {
        let mut value = String::new();
        let mut chars = rest.char_indices().peekable();
        let mut end = rest.len();
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    value.push('\'');
                    chars.next();
                    continue;
                }
                end = i + 1;
                break;
            }
            value.push(c);
        }
        let comment = rest[end..]
            .split_once('/')
            .map(|(_, c)| c.trim().to_string())
            .filter(|c| !c.is_empty());
        return (Some(value.trim_end().to_string()), comment);
    }

    let (value, comment) = match field.split_once('/') {
        Some((v, c)) => (v, Some(c.trim().to_string()).filter(|c| !c.is_empty())),
        None => (field, None),
    };
    let value = value.trim();
    ((!value.is_empty()).then(|| value.to_string()), comment)
}

fn find<'a>(cards: &'a [Card], keyword: &str) -> Option<&'a Card> {
    cards.iter().find(|card| card.keyword == keyword)
}

fn optional_int(cards: &[Card], keyword: &str) -> Result<Option<i64>, FitsError> {
    let Some(card) = find(cards, keyword) else {
        return Ok(None);
    };
    let raw = card.value.as_deref().unwrap_or("");
    parse_int(raw)
        .map(Some)
        .ok_or_else(|| FitsError::InvalidCard {
            keyword: keyword.to_string(),
            value: raw.to_string(),
        })
}

fn optional_float(cards: &[Card], keyword: &str) -> Result<Option<f64>, FitsError> {
    let Some(card) = find(cards, keyword) else {
        return Ok(None);
    };
    let raw = card.value.as_deref().unwrap_or("");
    // Fortran-style exponents (1.0D+02) are legal in FITS.
    raw.replace('D', "E")
        .replace('d', "E")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| FitsError::InvalidCard {
            keyword: keyword.to_string(),
            value: raw.to_string(),
        })
}

/// Integers occasionally come written as `2.0` by some writers.
fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        let f = raw.parse::<f64>().ok()?;
        (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    })
}

fn dimension(cards: &[Card], keyword: &str) -> Result<u32, FitsError> {
    match optional_int(cards, keyword) {
        Ok(Some(n)) if n > 0 && n <= u32::MAX as i64 => Ok(n as u32),
        Ok(_) | Err(FitsError::InvalidCard { .. }) => {
            Err(FitsError::MissingDimension(keyword.to_string()))
        }
        Err(e) => Err(e),
    }
}
