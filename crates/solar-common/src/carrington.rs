//! Carrington rotation numbering.
//!
//! Datasets in the archive are indexed by Carrington rotation. Rotation 1
//! began on 1853-11-09; each rotation lasts one synodic solar period.
//! Start times use the linear ephemeris
//! `JD = 2398140.227 + 27.2752316 * N`, which is accurate to a few hours
//! and good enough for labelling and archive lookups.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mean synodic rotation period of the Sun in days.
pub const SYNODIC_PERIOD_DAYS: f64 = 27.2753;

/// Julian date offset of the linear Carrington ephemeris.
const EPHEMERIS_EPOCH_JD: f64 = 2_398_140.227;

/// Period used by the linear Carrington ephemeris, in days.
const EPHEMERIS_PERIOD_DAYS: f64 = 27.275_231_6;

/// Julian date of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRotationError {
    #[error("invalid Carrington rotation: '{0}'")]
    Invalid(String),
}

/// A Carrington rotation number (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct CarringtonRotation(u32);

impl CarringtonRotation {
    /// Returns `None` for rotation 0, which does not exist.
    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    /// Approximate UTC start of this rotation.
    pub fn start(&self) -> DateTime<Utc> {
        julian_to_utc(start_jd(self.0 as f64))
    }

    /// Approximate UTC end of this rotation (start of the next one).
    ///
    /// Defined for every rotation, including the last representable one.
    pub fn end(&self) -> DateTime<Utc> {
        julian_to_utc(start_jd(self.0 as f64 + 1.0))
    }

    pub fn midpoint(&self) -> DateTime<Utc> {
        julian_to_utc(start_jd(self.0 as f64 + 0.5))
    }

    /// Following rotation, `None` past `u32::MAX`.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Previous rotation, `None` for rotation 1.
    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }

    /// The rotation in progress at `time`, `None` before rotation 1 began.
    pub fn containing(time: DateTime<Utc>) -> Option<Self> {
        let jd = utc_to_julian(time);
        let n = ((jd - EPHEMERIS_EPOCH_JD) / EPHEMERIS_PERIOD_DAYS).floor();
        if n < 1.0 || n > u32::MAX as f64 {
            return None;
        }
        Some(Self(n as u32))
    }

    /// Nominal duration of a rotation.
    pub fn period() -> Duration {
        Duration::milliseconds((SYNODIC_PERIOD_DAYS * MILLIS_PER_DAY) as i64)
    }
}

impl fmt::Display for CarringtonRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CR{}", self.0)
    }
}

impl From<CarringtonRotation> for u32 {
    fn from(rotation: CarringtonRotation) -> Self {
        rotation.0
    }
}

impl TryFrom<u32> for CarringtonRotation {
    type Error = ParseRotationError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::new(number).ok_or_else(|| ParseRotationError::Invalid(number.to_string()))
    }
}

impl FromStr for CarringtonRotation {
    type Err = ParseRotationError;

    /// Accepts `2240`, `CR2240` or `cr2240`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("CR")
            .or_else(|| trimmed.strip_prefix("cr"))
            .unwrap_or(trimmed);

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseRotationError::Invalid(s.to_string()))
    }
}

fn start_jd(rotation: f64) -> f64 {
    EPHEMERIS_EPOCH_JD + EPHEMERIS_PERIOD_DAYS * rotation
}

/// Saturates at the ends of the representable range.
fn julian_to_utc(jd: f64) -> DateTime<Utc> {
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round() as i64;
    Utc.timestamp_millis_opt(millis).single().unwrap_or(if jd > UNIX_EPOCH_JD {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

fn utc_to_julian(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_rotation_zero_rejected() {
        assert!(CarringtonRotation::new(0).is_none());
        assert!(CarringtonRotation::new(1).unwrap().previous().is_none());
    }

    #[test]
    fn test_cr2240_starts_january_2021() {
        let start = CarringtonRotation::new(2240).unwrap().start();
        assert_eq!(start.year(), 2021);
        assert_eq!(start.month(), 1);
        assert_eq!(start.day(), 22);
    }

    #[test]
    fn test_cr1_starts_november_1853() {
        let start = CarringtonRotation::new(1).unwrap().start();
        assert_eq!(start.year(), 1853);
        assert_eq!(start.month(), 11);
        // The linear ephemeris lands a few minutes past midnight of the 10th.
        assert!(start.day() == 9 || start.day() == 10);
    }

    #[test]
    fn test_containing_round_trip() {
        for n in [1u32, 2096, 2240, 2270] {
            let cr = CarringtonRotation::new(n).unwrap();
            let inside = cr.start() + Duration::hours(1);
            assert_eq!(CarringtonRotation::containing(inside), Some(cr));
            assert_eq!(CarringtonRotation::containing(cr.midpoint()), Some(cr));
        }
    }

    #[test]
    fn test_containing_before_first_rotation() {
        let early = Utc.with_ymd_and_hms(1800, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(CarringtonRotation::containing(early), None);
    }

    #[test]
    fn test_rotation_length_close_to_period() {
        let cr = CarringtonRotation::new(2240).unwrap();
        let length = cr.end() - cr.start();
        let diff = (length - CarringtonRotation::period()).num_minutes().abs();
        assert!(diff < 5, "rotation length off by {} minutes", diff);
    }

    #[test]
    fn test_neighbours() {
        let cr = CarringtonRotation::new(2240).unwrap();
        assert_eq!(cr.next().map(|n| n.number()), Some(2241));
        assert_eq!(cr.previous().map(|n| n.number()), Some(2239));
    }

    #[test]
    fn test_last_rotation_has_no_successor() {
        let last: CarringtonRotation = "4294967295".parse().unwrap();
        assert_eq!(last.next(), None);
        assert!(last.end() >= last.start());
        assert!(last.midpoint() >= last.start());
    }

    #[test]
    fn test_serde_rejects_rotation_zero() {
        let cr: CarringtonRotation = serde_json::from_str("2240").unwrap();
        assert_eq!(cr.number(), 2240);
        assert_eq!(serde_json::to_string(&cr).unwrap(), "2240");
        assert!(serde_json::from_str::<CarringtonRotation>("0").is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let cr: CarringtonRotation = "CR2240".parse().unwrap();
        assert_eq!(cr.number(), 2240);
        assert_eq!(cr.to_string(), "CR2240");
        assert_eq!("cr2096".parse::<CarringtonRotation>().unwrap().number(), 2096);
        assert_eq!(" 2150 ".parse::<CarringtonRotation>().unwrap().number(), 2150);
        assert!("0".parse::<CarringtonRotation>().is_err());
        assert!("CRxyz".parse::<CarringtonRotation>().is_err());
    }
}
