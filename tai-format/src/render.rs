//! Rendering a civil time through a parsed format

use crate::directive::{Directive, Item, CLOCK_12, CLOCK_24, DATE, HOUR_MINUTE, ISO_DATE};
use crate::parser::parse;
use crate::FormatError;
use tai_core::iso_week::{iso_week, monday_week_number, sunday_week_number};
use tai_core::CivilTime;
use tai_host::{asctime, BrokenDownTime, LocalTimeResolver, LocaleFormatter};

/// strftime-style formatter
///
/// Derived fields of the civil time are filled in only when a directive
/// needs them, and stay cached on the value afterwards.
pub struct Formatter<'a> {
    locale: &'a dyn LocaleFormatter,
    resolver: &'a dyn LocalTimeResolver,
}

impl<'a> Formatter<'a> {
    pub fn new(locale: &'a dyn LocaleFormatter, resolver: &'a dyn LocalTimeResolver) -> Self {
        Self { locale, resolver }
    }

    /// Render `civil` through `format`
    ///
    /// Either the whole text is returned or an error; partial output is
    /// never exposed.
    pub fn format(&self, format: &str, civil: &mut CivilTime) -> Result<String, FormatError> {
        let items = parse(format)?;
        let mut out = String::with_capacity(format.len() * 2);
        self.render_items(&items, civil, &mut out)?;
        Ok(out)
    }

    fn render_items(
        &self,
        items: &[Item<'_>],
        civil: &mut CivilTime,
        out: &mut String,
    ) -> Result<(), FormatError> {
        for item in items {
            match item {
                Item::Literal(text) => out.push_str(text),
                Item::Directive(directive) => self.render_directive(*directive, civil, out)?,
            }
        }
        Ok(())
    }

    fn render_directive(
        &self,
        directive: Directive,
        civil: &mut CivilTime,
        out: &mut String,
    ) -> Result<(), FormatError> {
        use Directive::*;

        match directive {
            WeekdayShort => self.render_locale('a', civil, out)?,
            WeekdayFull => self.render_locale('A', civil, out)?,
            MonthShort => self.render_locale('b', civil, out)?,
            MonthFull => self.render_locale('B', civil, out)?,
            LocaleDateTime => self.render_locale('c', civil, out)?,
            AmPmUpper => self.render_locale('p', civil, out)?,
            AmPmLower => self.render_locale('P', civil, out)?,
            LocaleDate => self.render_locale('x', civil, out)?,
            LocaleTime => self.render_locale('X', civil, out)?,
            Century => {
                let year = civil.year();
                if !(0..=9999).contains(&year) {
                    return Err(FormatError::FieldOutOfRange {
                        directive: 'C',
                        field: "year",
                        value: year,
                    });
                }
                out.push_str(&format!("{:02}", year / 100));
            }
            Day => out.push_str(&format!("{:02}", civil.day())),
            DaySpacePadded => out.push_str(&format!("{:>2}", civil.day())),
            IsoShortYear => {
                let week = civil.ensure_weekday_yearday()?;
                let iso = iso_week(civil.year(), week.yearday, week.weekday);
                out.push_str(&format!("{:02}", iso.short_year()));
            }
            IsoYear => {
                let week = civil.ensure_weekday_yearday()?;
                let iso = iso_week(civil.year(), week.yearday, week.weekday);
                out.push_str(&iso.year.to_string());
            }
            IsoWeek => {
                let week = civil.ensure_weekday_yearday()?;
                let iso = iso_week(civil.year(), week.yearday, week.weekday);
                out.push_str(&format!("{:02}", iso.week));
            }
            Hour24 => out.push_str(&format!("{:02}", civil.hour())),
            Hour12 => out.push_str(&format!("{:02}", twelve_hour(civil.hour()))),
            YearDay => {
                let week = civil.ensure_weekday_yearday()?;
                out.push_str(&format!("{:03}", week.yearday + 1));
            }
            Hour24SpacePadded => out.push_str(&format!("{:>2}", civil.hour())),
            Hour12SpacePadded => out.push_str(&format!("{:>2}", twelve_hour(civil.hour()))),
            Month => out.push_str(&format!("{:02}", civil.month())),
            Minute => out.push_str(&format!("{:02}", civil.minute())),
            EpochSeconds => {
                let stamp = civil.ensure_timestamp()?;
                out.push_str(&truncated_unix_seconds(stamp.unix_seconds(), stamp.nanosecond()).to_string());
            }
            Second => out.push_str(&format!("{:02}", civil.whole_second())),
            WeekdayMondayOne => {
                let week = civil.ensure_weekday_yearday()?;
                out.push_str(&((week.weekday + 6) % 7 + 1).to_string());
            }
            SundayWeek => {
                let week = civil.ensure_weekday_yearday()?;
                out.push_str(&format!("{:02}", sunday_week_number(week.yearday, week.weekday)));
            }
            Weekday => {
                let week = civil.ensure_weekday_yearday()?;
                out.push_str(&week.weekday.to_string());
            }
            MondayWeek => {
                let week = civil.ensure_weekday_yearday()?;
                out.push_str(&format!("{:02}", monday_week_number(week.yearday, week.weekday)));
            }
            ShortYear => out.push_str(&format!("{:02}", civil.year().rem_euclid(100))),
            Year => out.push_str(&civil.year().to_string()),
            UtcOffset => {
                let minutes = -civil.utc_offset() / 60;
                let sign = if minutes < 0 { '-' } else { '+' };
                let minutes = minutes.abs();
                out.push_str(&format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60));
            }
            ZoneName => match civil.zone() {
                Some(zone) => out.push_str(zone),
                None => {
                    let zone = self.resolver.zone_name(civil.dst().unwrap_or(false))?;
                    out.push_str(&zone);
                }
            },
            Date => self.render_composite(directive, DATE, civil, out)?,
            IsoDate => self.render_composite(directive, ISO_DATE, civil, out)?,
            Clock12 => self.render_composite(directive, CLOCK_12, civil, out)?,
            HourMinute => self.render_composite(directive, HOUR_MINUTE, civil, out)?,
            Clock24 => self.render_composite(directive, CLOCK_24, civil, out)?,
            Asctime => {
                let tm = BrokenDownTime::from_civil(civil)?;
                out.push_str(&asctime(&tm)?);
            }
            Newline => out.push('\n'),
            Tab => out.push('\t'),
            Percent => out.push('%'),
        }
        Ok(())
    }

    fn render_locale(&self, c: char, civil: &mut CivilTime, out: &mut String) -> Result<(), FormatError> {
        let tm = BrokenDownTime::from_civil(civil)?;
        out.push_str(&self.locale.format(c, &tm)?);
        Ok(())
    }

    fn render_composite(
        &self,
        directive: Directive,
        items: &[Item<'_>],
        civil: &mut CivilTime,
        out: &mut String,
    ) -> Result<(), FormatError> {
        tracing::trace!(?directive, "expanding composite directive");
        self.render_items(items, civil, out)
    }
}

/// Integer part of a Unix time, truncated toward zero
///
/// `seconds` is the floor; a negative instant with a fraction moves up by one.
fn truncated_unix_seconds(seconds: i128, nanosecond: u32) -> i128 {
    if seconds < 0 && nanosecond > 0 {
        seconds + 1
    } else {
        seconds
    }
}

/// 01-12, with 12 for noon and midnight
fn twelve_hour(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}
