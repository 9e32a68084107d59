//! The C/POSIX locale

use crate::{BrokenDownTime, HostError, LocaleFormatter};
use tai_core::calendar::{MONTH_NAMES, WEEKDAY_NAMES};

/// English names and the POSIX default layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct CLocale;

fn weekday_name(directive: char, tm: &BrokenDownTime) -> Result<&'static str, HostError> {
    WEEKDAY_NAMES
        .get(tm.weekday as usize)
        .copied()
        .ok_or(HostError::InvalidField { directive, field: "weekday" })
}

fn month_name(directive: char, tm: &BrokenDownTime) -> Result<&'static str, HostError> {
    (tm.month as usize)
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
        .ok_or(HostError::InvalidField { directive, field: "month" })
}

/// `Www Mmm dd hh:mm:ss yyyy`, the fixed layout of C `asctime`
pub fn asctime(tm: &BrokenDownTime) -> Result<String, HostError> {
    let weekday = weekday_name('+', tm)?;
    let month = month_name('+', tm)?;
    Ok(format!(
        "{} {} {:>2} {:02}:{:02}:{:02} {}",
        &weekday[..3],
        &month[..3],
        tm.day,
        tm.hour,
        tm.minute,
        tm.second,
        tm.year
    ))
}

impl LocaleFormatter for CLocale {
    fn name(&self) -> &str {
        "C"
    }

    fn format(&self, directive: char, tm: &BrokenDownTime) -> Result<String, HostError> {
        let text = match directive {
            'a' => weekday_name(directive, tm)?[..3].to_string(),
            'A' => weekday_name(directive, tm)?.to_string(),
            'b' | 'h' => month_name(directive, tm)?[..3].to_string(),
            'B' => month_name(directive, tm)?.to_string(),
            'c' => asctime(tm)?,
            'p' => (if tm.hour < 12 { "AM" } else { "PM" }).to_string(),
            'P' => (if tm.hour < 12 { "am" } else { "pm" }).to_string(),
            'x' => format!("{:02}/{:02}/{:02}", tm.month, tm.day, tm.year.rem_euclid(100)),
            'X' => format!("{:02}:{:02}:{:02}", tm.hour, tm.minute, tm.second),
            other => return Err(HostError::UnsupportedLocaleDirective(other)),
        };
        Ok(text)
    }
}
