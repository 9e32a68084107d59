//! Proleptic Gregorian calendar conversion
//!
//! Day numbers count from 0001-01-01 (day 0, a Monday). A day number is
//! split into 400-, 100-, 4- and 1-year cycles to find the year, and the
//! remaining day of the year is mapped to a month through a cumulative
//! days-per-month table with a separate leap-year row.

use crate::{AtomicTime, CoreError, UNIX_EPOCH_OFFSET};

pub const SECONDS_PER_DAY: i64 = 86_400;

const DAYS_PER_400_YEARS: i64 = 146_097;
const DAYS_PER_100_YEARS: i64 = 36_524;
const DAYS_PER_4_YEARS: i64 = 1_461;
const DAYS_PER_YEAR: i64 = 365;

/// Day number of 1970-01-01
const UNIX_EPOCH_DAY: i64 = 719_162;

/// Weekday of day 0 (Sunday = 0)
const REFERENCE_WEEKDAY: i64 = 1;

/// Days before the start of each month, common and leap years
const DAYS_BEFORE_MONTH: [[u16; 13]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366],
];

/// English weekday names, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Largest accepted |UTC offset| in seconds
pub const MAX_UTC_OFFSET: i32 = 86_399;

/// Calendar fields of one instant as seen at a given UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i64,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    /// 0-6, Sunday = 0
    pub weekday: u8,
    /// 0-365, zero-based
    pub yearday: u16,
}

/// Check if year is a leap year
pub fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

pub fn days_in_year(year: i64) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Days in a month (0 for a month outside 1-12)
pub fn days_in_month(year: i64, month: u8) -> u8 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let row = &DAYS_BEFORE_MONTH[is_leap_year(year) as usize];
    (row[month as usize] - row[month as usize - 1]) as u8
}

/// Weekday of a day number (Sunday = 0)
fn weekday_of(day_number: i64) -> u8 {
    (day_number + REFERENCE_WEEKDAY).rem_euclid(7) as u8
}

/// Split a day number into (year, month, day, yearday)
fn date_from_day_number(day_number: i64) -> (i64, u8, u8, u16) {
    let n400 = day_number.div_euclid(DAYS_PER_400_YEARS);
    let mut rem = day_number.rem_euclid(DAYS_PER_400_YEARS);

    // The last century and the last year of each cycle are one day longer,
    // so their quotients are capped.
    let n100 = (rem / DAYS_PER_100_YEARS).min(3);
    rem -= n100 * DAYS_PER_100_YEARS;
    let n4 = rem / DAYS_PER_4_YEARS;
    rem -= n4 * DAYS_PER_4_YEARS;
    let n1 = (rem / DAYS_PER_YEAR).min(3);
    rem -= n1 * DAYS_PER_YEAR;

    let year = 1 + 400 * n400 + 100 * n100 + 4 * n4 + n1;
    let yearday = rem as u16;

    let row = &DAYS_BEFORE_MONTH[is_leap_year(year) as usize];
    let mut month = 1;
    while month < 12 && yearday >= row[month] {
        month += 1;
    }
    let day = (yearday - row[month - 1] + 1) as u8;
    (year, month as u8, day, yearday)
}

/// Day number of a valid date
fn day_number_from_date(year: i64, month: u8, day: u8) -> i128 {
    let y = year as i128 - 1;
    let row = &DAYS_BEFORE_MONTH[is_leap_year(year) as usize];
    365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        + row[month as usize - 1] as i128
        + day as i128
        - 1
}

/// Reject fields outside their calendar range
pub fn validate_fields(
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    utc_offset: i32,
) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::civil_field("month", month, "1-12"));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(CoreError::civil_field("day", day, "a day within the month"));
    }
    if hour > 23 {
        return Err(CoreError::civil_field("hour", hour, "0-23"));
    }
    if minute > 59 {
        return Err(CoreError::civil_field("minute", minute, "0-59"));
    }
    validate_offset(utc_offset)
}

pub fn validate_offset(utc_offset: i32) -> Result<(), CoreError> {
    if utc_offset.abs() > MAX_UTC_OFFSET {
        return Err(CoreError::civil_field(
            "utc_offset",
            utc_offset,
            "-86399..86399 seconds",
        ));
    }
    Ok(())
}

/// Decompose an instant into calendar fields
///
/// `utc_offset` is in seconds west of UTC: local time is `utc - utc_offset`.
pub fn to_civil(at: AtomicTime, utc_offset: i32) -> CalendarFields {
    let local = at.unix_seconds() - utc_offset as i128;
    let days = local.div_euclid(SECONDS_PER_DAY as i128);
    let secs_of_day = local.rem_euclid(SECONDS_PER_DAY as i128) as u32;
    // |unix seconds| < 2^64, so the day number is far inside i64
    let day_number = days as i64 + UNIX_EPOCH_DAY;
    let (year, month, day, yearday) = date_from_day_number(day_number);

    CalendarFields {
        year,
        month,
        day,
        hour: (secs_of_day / 3600) as u8,
        minute: (secs_of_day % 3600 / 60) as u8,
        second: (secs_of_day % 60) as u8,
        nanosecond: at.nanosecond(),
        weekday: weekday_of(day_number),
        yearday,
    }
}

/// Compose calendar fields into an instant
///
/// The inverse of [`to_civil`]. `nanosecond` may exceed one second; the
/// excess carries into the seconds.
#[allow(clippy::too_many_arguments)]
pub fn from_civil(
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
    utc_offset: i32,
) -> Result<AtomicTime, CoreError> {
    validate_fields(year, month, day, hour, minute, utc_offset)?;
    if second > 59 {
        return Err(CoreError::civil_field("second", second, "0-59"));
    }
    let days = day_number_from_date(year, month, day) - UNIX_EPOCH_DAY as i128;
    let local = days
        .checked_mul(SECONDS_PER_DAY as i128)
        .ok_or(CoreError::TimestampOutOfRange)?
        + hour as i128 * 3600
        + minute as i128 * 60
        + second as i128;
    let unix = local + utc_offset as i128;
    AtomicTime::normalized(unix + UNIX_EPOCH_OFFSET as i128, nanosecond as i128)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(stamp: f64) -> AtomicTime {
        AtomicTime::from_unix_seconds(stamp).unwrap()
    }

    #[test]
    fn test_leap_year() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(-4));
        assert!(is_leap_year(0));
        assert!(!is_leap_year(-100));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 13), 0);
        assert_eq!(days_in_month(2023, 0), 0);
    }

    #[test]
    fn test_feb_29_validity() {
        assert!(from_civil(2000, 2, 29, 0, 0, 0, 0, 0).is_ok());
        assert!(from_civil(2024, 2, 29, 0, 0, 0, 0, 0).is_ok());
        assert!(from_civil(1900, 2, 29, 0, 0, 0, 0, 0).is_err());
        assert!(from_civil(2023, 2, 29, 0, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn test_unix_epoch_is_thursday() {
        let c = to_civil(at(0.0), 0);
        assert_eq!((c.year, c.month, c.day), (1970, 1, 1));
        assert_eq!((c.hour, c.minute, c.second), (0, 0, 0));
        assert_eq!(c.weekday, 4);
        assert_eq!(c.yearday, 0);
    }

    #[test]
    fn test_known_instants() {
        // 2000-02-29T12:34:56Z
        let c = to_civil(at(951_827_696.0), 0);
        assert_eq!((c.year, c.month, c.day), (2000, 2, 29));
        assert_eq!((c.hour, c.minute, c.second), (12, 34, 56));
        assert_eq!(c.weekday, 2);
        assert_eq!(c.yearday, 59);

        // 2023-12-31T23:59:59Z
        let c = to_civil(at(1_704_067_199.0), 0);
        assert_eq!((c.year, c.month, c.day), (2023, 12, 31));
        assert_eq!(c.yearday, 364);
        assert_eq!(c.weekday, 0);

        // 2024-12-31 is day 365 of a leap year
        let c = to_civil(at(1_735_603_200.0), 0);
        assert_eq!((c.year, c.month, c.day), (2024, 12, 31));
        assert_eq!(c.yearday, 365);
    }

    #[test]
    fn test_pre_epoch() {
        // 1969-12-31T23:59:59.5Z
        let c = to_civil(at(-0.5), 0);
        assert_eq!((c.year, c.month, c.day), (1969, 12, 31));
        assert_eq!((c.hour, c.minute, c.second), (23, 59, 59));
        assert_eq!(c.nanosecond, 500_000_000);
        assert_eq!(c.weekday, 3);

        // 1900-03-01, after the non-leap century February
        let c = to_civil(at(-2_203_891_200.0), 0);
        assert_eq!((c.year, c.month, c.day), (1900, 3, 1));
    }

    #[test]
    fn test_proleptic_far_past() {
        let t = from_civil(-4713, 11, 24, 12, 0, 0, 0, 0).unwrap();
        let c = to_civil(t, 0);
        assert_eq!((c.year, c.month, c.day, c.hour), (-4713, 11, 24, 12));

        let t = from_civil(1, 1, 1, 0, 0, 0, 0, 0).unwrap();
        let c = to_civil(t, 0);
        assert_eq!((c.year, c.month, c.day), (1, 1, 1));
        assert_eq!(c.weekday, 1);
    }

    #[test]
    fn test_offset_is_seconds_west() {
        // Local 01:00 at utc_offset -3600 (UTC+1) is midnight UTC
        let t = from_civil(1970, 1, 1, 1, 0, 0, 0, -3600).unwrap();
        assert_eq!(t.unix_seconds(), 0);
        let c = to_civil(t, -3600);
        assert_eq!((c.day, c.hour), (1, 1));
        // West of UTC the local date is still the previous day
        let c = to_civil(t, 3600);
        assert_eq!((c.year, c.month, c.day, c.hour), (1969, 12, 31, 23));
        assert_eq!(c.weekday, 3);
    }

    #[test]
    fn test_round_trip_every_day_1896_2104() {
        let mut t = from_civil(1896, 1, 1, 6, 7, 8, 0, 0).unwrap();
        let end = from_civil(2104, 12, 31, 0, 0, 0, 0, 0).unwrap();
        let mut expected_weekday = to_civil(t, 0).weekday;
        while t < end {
            let c = to_civil(t, 0);
            assert_eq!(c.weekday, expected_weekday);
            let back = from_civil(c.year, c.month, c.day, c.hour, c.minute, c.second, 0, 0).unwrap();
            assert_eq!(back, t);
            t = t.checked_add_seconds(SECONDS_PER_DAY).unwrap();
            expected_weekday = (expected_weekday + 1) % 7;
        }
    }

    #[test]
    fn test_round_trip_extremes() {
        for stamp in [-1.2e19, -62_135_596_800.0, 253_402_300_799.0, 4.6e18] {
            let t = at(stamp);
            let c = to_civil(t, 0);
            let back = from_civil(c.year, c.month, c.day, c.hour, c.minute, c.second, c.nanosecond, 0)
                .unwrap();
            assert_eq!(back, t, "{}", stamp);
        }
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        assert!(matches!(
            from_civil(2023, 13, 1, 0, 0, 0, 0, 0),
            Err(CoreError::InvalidCivilField { field: "month", .. })
        ));
        assert!(matches!(
            from_civil(2023, 4, 31, 0, 0, 0, 0, 0),
            Err(CoreError::InvalidCivilField { field: "day", .. })
        ));
        assert!(from_civil(2023, 4, 0, 0, 0, 0, 0, 0).is_err());
        assert!(from_civil(2023, 4, 1, 24, 0, 0, 0, 0).is_err());
        assert!(from_civil(2023, 4, 1, 0, 60, 0, 0, 0).is_err());
        assert!(from_civil(2023, 4, 1, 0, 0, 0, 0, 86_400).is_err());
    }

    #[test]
    fn test_year_overflow() {
        assert_eq!(
            from_civil(i64::MAX, 1, 1, 0, 0, 0, 0, 0),
            Err(CoreError::TimestampOutOfRange)
        );
    }
}
