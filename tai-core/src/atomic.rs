//! Continuous atomic time
//!
//! `AtomicTime` counts whole seconds from an internal origin placed
//! 2^62 + 10 seconds before 1970-01-01T00:00:00Z, plus a nanosecond fraction.
//! The scale has no leap-second discontinuities. Every practical timestamp
//! is a positive internal count, so calendar arithmetic never works on
//! negative dividends.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Internal seconds at 1970-01-01T00:00:00Z
pub const UNIX_EPOCH_OFFSET: i64 = 4_611_686_018_427_387_914;

/// A point on the continuous time scale
///
/// Invariant: `nanos < NANOS_PER_SECOND`. Every constructor normalizes, so
/// ordering by `(secs, nanos)` is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AtomicRepr", into = "AtomicRepr")]
pub struct AtomicTime {
    secs: i64,
    nanos: u32,
}

#[derive(Serialize, Deserialize)]
struct AtomicRepr {
    secs: i64,
    nanos: u32,
}

impl TryFrom<AtomicRepr> for AtomicTime {
    type Error = CoreError;

    fn try_from(repr: AtomicRepr) -> Result<Self, CoreError> {
        Self::normalized(repr.secs as i128, repr.nanos as i128)
    }
}

impl From<AtomicTime> for AtomicRepr {
    fn from(t: AtomicTime) -> Self {
        Self { secs: t.secs, nanos: t.nanos }
    }
}

impl AtomicTime {
    // ========== Construction ==========

    /// Build from internal seconds and a nanosecond count of any size,
    /// carrying or borrowing whole seconds out of `nanos`.
    pub(crate) fn normalized(secs: i128, nanos: i128) -> Result<Self, CoreError> {
        let per = NANOS_PER_SECOND as i128;
        let secs = secs + nanos.div_euclid(per);
        let secs = i64::try_from(secs).map_err(|_| CoreError::TimestampOutOfRange)?;
        Ok(Self {
            secs,
            nanos: nanos.rem_euclid(per) as u32,
        })
    }

    /// Convert fractional seconds since 1970-01-01T00:00:00Z
    ///
    /// The value is split with floor semantics (-0.25 becomes -1 s plus
    /// 750_000_000 ns) and the fraction is truncated to nanoseconds.
    pub fn from_unix_seconds(seconds: f64) -> Result<Self, CoreError> {
        if !seconds.is_finite() {
            return Err(CoreError::InvalidNumericInput(seconds));
        }
        let whole = seconds.floor();
        if whole.abs() > 1e20 {
            return Err(CoreError::TimestampOutOfRange);
        }
        let fraction = seconds - whole;
        let whole = whole as i128;
        let nanos = (fraction * NANOS_PER_SECOND as f64) as i128;
        Self::normalized(whole + UNIX_EPOCH_OFFSET as i128, nanos)
    }

    /// Build from whole Unix seconds and a nanosecond count
    pub fn from_unix_parts(secs: i64, nanos: u32) -> Result<Self, CoreError> {
        Self::normalized(secs as i128 + UNIX_EPOCH_OFFSET as i128, nanos as i128)
    }

    /// Current system time
    pub fn now() -> Self {
        let since_epoch = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            secs: since_epoch.as_secs() as i64 + UNIX_EPOCH_OFFSET,
            nanos: since_epoch.subsec_nanos(),
        }
    }

    // ========== Accessors ==========

    /// Whole seconds since the internal origin
    pub fn internal_seconds(&self) -> i64 {
        self.secs
    }

    /// Nanosecond fraction (0-999_999_999)
    pub fn nanosecond(&self) -> u32 {
        self.nanos
    }

    /// Whole Unix seconds (floor)
    ///
    /// Wider than `i64` because the internal range extends below
    /// `i64::MIN` once the epoch offset is removed.
    pub fn unix_seconds(&self) -> i128 {
        self.secs as i128 - UNIX_EPOCH_OFFSET as i128
    }

    /// Fractional seconds since 1970-01-01T00:00:00Z
    pub fn to_unix_seconds(&self) -> f64 {
        self.unix_seconds() as f64 + self.nanos as f64 / NANOS_PER_SECOND as f64
    }

    // ========== Arithmetic ==========

    pub fn checked_add_seconds(&self, seconds: i64) -> Option<Self> {
        self.secs.checked_add(seconds).map(|secs| Self { secs, nanos: self.nanos })
    }

    pub fn checked_sub_seconds(&self, seconds: i64) -> Option<Self> {
        self.secs.checked_sub(seconds).map(|secs| Self { secs, nanos: self.nanos })
    }

    /// Signed distance to `earlier` in fractional seconds
    pub fn seconds_since(&self, earlier: &AtomicTime) -> f64 {
        let secs = self.secs as i128 - earlier.secs as i128;
        let nanos = self.nanos as i64 - earlier.nanos as i64;
        secs as f64 + nanos as f64 / NANOS_PER_SECOND as f64
    }
}

impl fmt::Display for AtomicTime {
    /// Unix seconds with nine fractional digits
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unix = self.unix_seconds();
        if unix < 0 && self.nanos > 0 {
            write!(f, "-{}.{:09}", -(unix + 1), NANOS_PER_SECOND - self.nanos)
        } else {
            write!(f, "{}.{:09}", unix, self.nanos)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch() {
        let t = AtomicTime::from_unix_seconds(0.0).unwrap();
        assert_eq!(t.internal_seconds(), UNIX_EPOCH_OFFSET);
        assert_eq!(t.nanosecond(), 0);
        assert_eq!(t.unix_seconds(), 0);
    }

    #[test]
    fn test_negative_fraction_borrows() {
        let t = AtomicTime::from_unix_seconds(-0.25).unwrap();
        assert_eq!(t.unix_seconds(), -1);
        assert_eq!(t.nanosecond(), 750_000_000);
        assert_eq!(t.to_unix_seconds(), -0.25);
    }

    #[test]
    fn test_fraction_truncated() {
        let t = AtomicTime::from_unix_seconds(1.5).unwrap();
        assert_eq!(t.unix_seconds(), 1);
        assert_eq!(t.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            AtomicTime::from_unix_seconds(f64::NAN),
            Err(CoreError::InvalidNumericInput(_))
        ));
        assert!(AtomicTime::from_unix_seconds(f64::INFINITY).is_err());
        assert!(AtomicTime::from_unix_seconds(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            AtomicTime::from_unix_seconds(1e19),
            Err(CoreError::TimestampOutOfRange)
        );
        assert_eq!(
            AtomicTime::from_unix_seconds(-1e300),
            Err(CoreError::TimestampOutOfRange)
        );
        // Far below i64::MIN in Unix terms is still representable internally
        assert!(AtomicTime::from_unix_seconds(-1.3e19).is_ok());
    }

    #[test]
    fn test_parts_normalize() {
        let t = AtomicTime::from_unix_parts(10, 2_500_000_000).unwrap();
        assert_eq!(t.unix_seconds(), 12);
        assert_eq!(t.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_round_trip_unix_seconds() {
        for stamp in [0.0, 1.0, -1.0, 1_700_000_000.125, -86_400.5, 951_782_400.0] {
            let t = AtomicTime::from_unix_seconds(stamp).unwrap();
            assert!((t.to_unix_seconds() - stamp).abs() < 1e-6, "{}", stamp);
        }
    }

    #[test]
    fn test_arithmetic_and_ordering() {
        let a = AtomicTime::from_unix_seconds(100.25).unwrap();
        let b = a.checked_add_seconds(60).unwrap();
        assert!(b > a);
        assert_eq!(b.unix_seconds(), 160);
        assert_eq!(b.nanosecond(), 250_000_000);
        assert_eq!(b.checked_sub_seconds(60), Some(a));
        assert_eq!(b.seconds_since(&a), 60.0);
        assert_eq!(a.seconds_since(&b), -60.0);

        let c = AtomicTime::from_unix_seconds(100.5).unwrap();
        assert!(a < c);
        assert!(AtomicTime::from_unix_parts(0, 0).unwrap().checked_add_seconds(i64::MAX).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(AtomicTime::from_unix_seconds(1.5).unwrap().to_string(), "1.500000000");
        assert_eq!(AtomicTime::from_unix_seconds(-1.5).unwrap().to_string(), "-1.500000000");
        assert_eq!(AtomicTime::from_unix_seconds(-2.0).unwrap().to_string(), "-2.000000000");
    }

    #[test]
    fn test_serde_normalizes() {
        let t: AtomicTime =
            serde_json::from_str(r#"{"secs": 5, "nanos": 1500000000}"#).unwrap();
        assert_eq!(t.internal_seconds(), 6);
        assert_eq!(t.nanosecond(), 500_000_000);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"secs":6,"nanos":500000000}"#);
    }
}
