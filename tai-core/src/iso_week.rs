//! ISO-8601 week numbering
//!
//! ISO weeks start on Monday and week 1 is the week holding the year's first
//! Thursday, so the last days of December can belong to week 1 of the next
//! ISO year and the first days of January to the last week of the previous
//! one.

use crate::calendar::days_in_year;
use serde::{Deserialize, Serialize};

const ISO_WEEK_START_WEEKDAY: i32 = 1; // Monday
const ISO_WEEK1_WEEKDAY: i32 = 4; // Thursday
const YEARDAY_MINIMUM: i32 = -366;

/// Keeps the left operand of `%` non-negative for any year-day down to
/// `YEARDAY_MINIMUM`
const BIG_ENOUGH_MULTIPLE_OF_7: i32 = (-YEARDAY_MINIMUM / 7 + 2) * 7;

/// ISO week-based year and week number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoWeek {
    pub year: i64,
    /// 1-53
    pub week: u8,
}

impl IsoWeek {
    /// ISO year modulo 100, always 0-99
    pub fn short_year(&self) -> u8 {
        self.year.rem_euclid(100) as u8
    }
}

/// Days from the Monday starting ISO week 1 to the day `yearday`
///
/// Negative when the day precedes week 1 of the year `yearday` counts from.
fn iso_week_days(yearday: i32, weekday: i32) -> i32 {
    yearday - (yearday - weekday + ISO_WEEK1_WEEKDAY + BIG_ENOUGH_MULTIPLE_OF_7) % 7
        + ISO_WEEK1_WEEKDAY
        - ISO_WEEK_START_WEEKDAY
}

/// ISO week of a calendar day
///
/// `yearday` is zero-based within `year`, `weekday` is 0-6 with Sunday = 0.
pub fn iso_week(year: i64, yearday: u16, weekday: u8) -> IsoWeek {
    let yearday = yearday as i32;
    let weekday = weekday as i32;
    let mut year = year;
    let mut days = iso_week_days(yearday, weekday);

    if days < 0 {
        // Last week of the previous ISO year
        year -= 1;
        days = iso_week_days(yearday + days_in_year(year) as i32, weekday);
    } else {
        let next = iso_week_days(yearday - days_in_year(year) as i32, weekday);
        if next >= 0 {
            // First week of the next ISO year
            year += 1;
            days = next;
        }
    }

    IsoWeek {
        year,
        week: (days / 7 + 1) as u8,
    }
}

/// Week of the year with weeks starting on Sunday (00-53)
pub fn sunday_week_number(yearday: u16, weekday: u8) -> u8 {
    let yearday = yearday as i32;
    ((yearday - (yearday - weekday as i32 + 7) % 7 + 7) / 7) as u8
}

/// Week of the year with weeks starting on Monday (00-53)
pub fn monday_week_number(yearday: u16, weekday: u8) -> u8 {
    let yearday = yearday as i32;
    ((yearday - (yearday - weekday as i32 + 8) % 7 + 7) / 7) as u8
}
