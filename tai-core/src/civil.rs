//! Civil (calendar) time with lazily derived fields
//!
//! A `CivilTime` holds the fields a person reads off a calendar and a clock,
//! plus the UTC offset and zone metadata they were read in. The timestamp
//! and the weekday/year-day are derived on first use and cached; each cache
//! is an `Option`, so whether it is populated is visible in the type.

use crate::calendar::{self, CalendarFields};
use crate::{AtomicTime, CoreError, NANOS_PER_SECOND};
use serde::{Deserialize, Serialize};

/// Weekday (0 = Sunday) and zero-based day of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayYearday {
    pub weekday: u8,
    pub yearday: u16,
}

/// The 9-field civil record exchanged with callers
///
/// `None` marks a field as unspecified. An unspecified `utc_offset` means
/// "the process local timezone" and must be resolved before the record
/// becomes a [`CivilTime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CivilFields {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
    /// Seconds west of UTC (`utc = local + utc_offset`)
    #[serde(default)]
    pub utc_offset: Option<i32>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub dst: Option<bool>,
}

/// A validated civil time
#[derive(Debug, Clone, PartialEq)]
pub struct CivilTime {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    /// [0, 60), sub-second precision
    second: f64,
    utc_offset: i32,
    zone: Option<String>,
    dst: Option<bool>,
    stamp: Option<AtomicTime>,
    week: Option<WeekdayYearday>,
}

impl CivilTime {
    // ========== Construction ==========

    /// Build from caller-supplied fields; both derived caches start empty
    ///
    /// Out-of-range fields are rejected, never normalized.
    pub fn new(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
        utc_offset: i32,
    ) -> Result<Self, CoreError> {
        calendar::validate_fields(year, month, day, hour, minute, utc_offset)?;
        if !second.is_finite() || !(0.0..60.0).contains(&second) {
            return Err(CoreError::civil_field("second", second, "[0, 60)"));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            utc_offset,
            zone: None,
            dst: None,
            stamp: None,
            week: None,
        })
    }

    /// Decompose an instant at a fixed offset (seconds west of UTC)
    ///
    /// The converter yields the weekday and year-day anyway, so both caches
    /// come back populated.
    pub fn from_atomic(at: AtomicTime, utc_offset: i32) -> Result<Self, CoreError> {
        calendar::validate_offset(utc_offset)?;
        Self::from_calendar(calendar::to_civil(at, utc_offset), utc_offset, at)
    }

    /// Wrap already decomposed fields of `at`
    ///
    /// The fields may come from outside this crate (a host timezone
    /// resolver), so they are range-checked like [`CivilTime::new`].
    pub fn from_calendar(
        fields: CalendarFields,
        utc_offset: i32,
        at: AtomicTime,
    ) -> Result<Self, CoreError> {
        calendar::validate_fields(
            fields.year,
            fields.month,
            fields.day,
            fields.hour,
            fields.minute,
            utc_offset,
        )?;
        if fields.second > 59 {
            return Err(CoreError::civil_field("second", fields.second, "0-59"));
        }
        if fields.nanosecond >= NANOS_PER_SECOND {
            return Err(CoreError::civil_field(
                "nanosecond",
                fields.nanosecond,
                "0-999999999",
            ));
        }
        if fields.weekday > 6 {
            return Err(CoreError::civil_field("weekday", fields.weekday, "0-6"));
        }
        if fields.yearday >= 365 + calendar::is_leap_year(fields.year) as u16 {
            return Err(CoreError::civil_field(
                "yearday",
                fields.yearday,
                "a day within the year",
            ));
        }
        Ok(Self {
            year: fields.year,
            month: fields.month,
            day: fields.day,
            hour: fields.hour,
            minute: fields.minute,
            second: fields.second as f64 + fields.nanosecond as f64 / NANOS_PER_SECOND as f64,
            utc_offset,
            zone: None,
            dst: None,
            stamp: Some(at),
            week: Some(WeekdayYearday {
                weekday: fields.weekday,
                yearday: fields.yearday,
            }),
        })
    }

    /// Builder: set the zone label
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Builder: set the daylight saving flag
    pub fn with_dst(mut self, dst: bool) -> Self {
        self.dst = Some(dst);
        self
    }

    // ========== Accessors ==========

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Fractional seconds
    pub fn second(&self) -> f64 {
        self.second
    }

    /// Whole seconds (0-59)
    pub fn whole_second(&self) -> u8 {
        self.second.floor() as u8
    }

    /// Seconds west of UTC
    pub fn utc_offset(&self) -> i32 {
        self.utc_offset
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn dst(&self) -> Option<bool> {
        self.dst
    }

    pub fn cached_timestamp(&self) -> Option<AtomicTime> {
        self.stamp
    }

    pub fn cached_weekday_yearday(&self) -> Option<WeekdayYearday> {
        self.week
    }

    // ========== Lazy population ==========

    /// The instant these fields denote, computed once
    pub fn ensure_timestamp(&mut self) -> Result<AtomicTime, CoreError> {
        if let Some(stamp) = self.stamp {
            return Ok(stamp);
        }
        let whole = self.second.floor();
        let nanos = ((self.second - whole) * NANOS_PER_SECOND as f64) as u32;
        let stamp = calendar::from_civil(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            whole as u8,
            nanos,
            self.utc_offset,
        )?;
        tracing::trace!(%stamp, "cached civil timestamp");
        self.stamp = Some(stamp);
        Ok(stamp)
    }

    /// Weekday and year-day, computed once
    pub fn ensure_weekday_yearday(&mut self) -> Result<WeekdayYearday, CoreError> {
        if let Some(week) = self.week {
            return Ok(week);
        }
        let stamp = self.ensure_timestamp()?;
        let fields = calendar::to_civil(stamp, self.utc_offset);
        let week = WeekdayYearday {
            weekday: fields.weekday,
            yearday: fields.yearday,
        };
        self.week = Some(week);
        Ok(week)
    }

    /// Fractional seconds since 1970-01-01T00:00:00Z
    pub fn timestamp(&mut self) -> Result<f64, CoreError> {
        self.ensure_timestamp().map(|t| t.to_unix_seconds())
    }

    /// The record form of these fields
    pub fn to_fields(&self) -> CivilFields {
        CivilFields {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            utc_offset: Some(self.utc_offset),
            zone: self.zone.clone(),
            dst: self.dst,
        }
    }
}

impl TryFrom<CivilFields> for CivilTime {
    type Error = CoreError;

    fn try_from(fields: CivilFields) -> Result<Self, CoreError> {
        let utc_offset = fields
            .utc_offset
            .ok_or_else(|| CoreError::civil_field("utc_offset", "unspecified", "a resolved offset"))?;
        let mut civil = Self::new(
            fields.year,
            fields.month,
            fields.day,
            fields.hour,
            fields.minute,
            fields.second,
            utc_offset,
        )?;
        civil.zone = fields.zone;
        civil.dst = fields.dst;
        Ok(civil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(year: i64, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> CivilTime {
        CivilTime::new(year, month, day, hour, minute, second, 0).unwrap()
    }

    #[test]
    fn test_from_calendar_rejects_out_of_range_fields() {
        let at = AtomicTime::from_unix_seconds(0.0).unwrap();
        let good = calendar::to_civil(at, 0);
        assert!(CivilTime::from_calendar(good, 0, at).is_ok());

        let bad = [
            CalendarFields { month: 13, ..good },
            CalendarFields { day: 40, ..good },
            CalendarFields { hour: 25, ..good },
            CalendarFields { minute: 61, ..good },
            CalendarFields { second: 60, ..good },
            CalendarFields { nanosecond: NANOS_PER_SECOND, ..good },
            CalendarFields { weekday: 7, ..good },
            CalendarFields { yearday: 365, ..good },
        ];
        for fields in bad {
            assert!(
                matches!(
                    CivilTime::from_calendar(fields, 0, at),
                    Err(CoreError::InvalidCivilField { .. })
                ),
                "{:?}",
                fields
            );
        }
        assert!(CivilTime::from_calendar(good, 90_000, at).is_err());
    }

    #[test]
    fn test_new_starts_without_derived_fields() {
        let c = civil(2023, 7, 4, 12, 0, 0.0);
        assert_eq!(c.cached_timestamp(), None);
        assert_eq!(c.cached_weekday_yearday(), None);
        assert_eq!(c.zone(), None);
        assert_eq!(c.dst(), None);
    }

    #[test]
    fn test_ensure_timestamp() {
        let mut c = civil(1970, 1, 2, 0, 0, 1.25);
        assert_eq!(c.timestamp().unwrap(), 86_401.25);
        assert!(c.cached_timestamp().is_some());
        assert_eq!(c.cached_weekday_yearday(), None);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut c = civil(2024, 2, 29, 23, 59, 59.75);
        let first_stamp = c.ensure_timestamp().unwrap();
        let first_week = c.ensure_weekday_yearday().unwrap();
        let snapshot = c.clone();
        assert_eq!(c.ensure_timestamp().unwrap(), first_stamp);
        assert_eq!(c.ensure_weekday_yearday().unwrap(), first_week);
        assert_eq!(c, snapshot);
        assert_eq!(first_week, WeekdayYearday { weekday: 4, yearday: 59 });
    }

    #[test]
    fn test_weekday_uses_local_date() {
        // 23:30 local at UTC-5 is already the next day in UTC
        let mut c = CivilTime::new(2023, 7, 4, 23, 30, 0.0, 5 * 3600).unwrap();
        let week = c.ensure_weekday_yearday().unwrap();
        assert_eq!(week.weekday, 2); // Tuesday, 4 July 2023
        assert_eq!(week.yearday, 184);
    }

    #[test]
    fn test_from_atomic_round_trip() {
        let at = AtomicTime::from_unix_seconds(1_688_474_096.5).unwrap();
        let c = CivilTime::from_atomic(at, -7200).unwrap();
        assert_eq!((c.year(), c.month(), c.day()), (2023, 7, 4));
        assert_eq!((c.hour(), c.minute(), c.whole_second()), (14, 34, 56));
        assert_eq!(c.second(), 56.5);

        let mut fresh = CivilTime::new(c.year(), c.month(), c.day(), c.hour(), c.minute(), c.second(), -7200)
            .unwrap();
        assert_eq!(fresh.ensure_timestamp().unwrap(), at);
        assert_eq!(fresh.ensure_weekday_yearday().unwrap(), c.cached_weekday_yearday().unwrap());
    }

    #[test]
    fn test_compose_then_decompose() {
        for (y, mo, d, h, mi, s, off) in [
            (2023, 7, 4, 0, 0, 0.0, 0),
            (1999, 12, 31, 23, 59, 59.0, -3600),
            (1900, 2, 28, 12, 30, 15.0, 18_000),
            (-44, 3, 15, 9, 0, 0.0, 0),
        ] {
            let mut c = CivilTime::new(y, mo, d, h, mi, s, off).unwrap();
            let at = c.ensure_timestamp().unwrap();
            let back = CivilTime::from_atomic(at, off).unwrap();
            assert_eq!(
                (back.year(), back.month(), back.day(), back.hour(), back.minute(), back.second()),
                (y, mo, d, h, mi, s)
            );
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(CivilTime::new(2023, 13, 1, 0, 0, 0.0, 0).is_err());
        assert!(CivilTime::new(2023, 2, 29, 0, 0, 0.0, 0).is_err());
        assert!(CivilTime::new(2023, 1, 32, 0, 0, 0.0, 0).is_err());
        assert!(CivilTime::new(2023, 1, 1, 0, 0, 60.0, 0).is_err());
        assert!(CivilTime::new(2023, 1, 1, 0, 0, -0.5, 0).is_err());
        assert!(CivilTime::new(2023, 1, 1, 0, 0, f64::NAN, 0).is_err());
        assert!(CivilTime::from_atomic(AtomicTime::now(), 100_000).is_err());
    }

    #[test]
    fn test_fields_record() {
        let json = r#"{"year":2023,"month":7,"day":4,"hour":1,"minute":2,"second":3.5,
                       "utc_offset":-3600,"zone":"CEST","dst":true}"#;
        let fields: CivilFields = serde_json::from_str(json).unwrap();
        let c = CivilTime::try_from(fields.clone()).unwrap();
        assert_eq!(c.zone(), Some("CEST"));
        assert_eq!(c.dst(), Some(true));
        assert_eq!(c.to_fields(), fields);

        let local: CivilFields =
            serde_json::from_str(r#"{"year":2023,"month":7,"day":4,"hour":1,"minute":2,"second":3}"#)
                .unwrap();
        assert_eq!(local.utc_offset, None);
        assert!(matches!(
            CivilTime::try_from(local),
            Err(CoreError::InvalidCivilField { field: "utc_offset", .. })
        ));
    }
}
