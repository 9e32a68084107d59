//! Collaborator traits

use crate::HostError;
use tai_core::{AtomicTime, CalendarFields, CivilTime, CoreError};

/// Calendar fields handed to a locale formatter, in the shape of a C `tm`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenDownTime {
    pub year: i64,
    /// 1-12
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// 0-6, Sunday = 0
    pub weekday: u8,
    /// 0-365
    pub yearday: u16,
    /// Seconds west of UTC
    pub utc_offset: i32,
    pub dst: Option<bool>,
}

impl BrokenDownTime {
    /// Snapshot a civil time, filling its weekday/year-day cache if needed
    pub fn from_civil(civil: &mut CivilTime) -> Result<Self, CoreError> {
        let week = civil.ensure_weekday_yearday()?;
        Ok(Self {
            year: civil.year(),
            month: civil.month(),
            day: civil.day(),
            hour: civil.hour(),
            minute: civil.minute(),
            second: civil.whole_second(),
            weekday: week.weekday,
            yearday: week.yearday,
            utc_offset: civil.utc_offset(),
            dst: civil.dst(),
        })
    }
}

/// Renders the locale-dependent directives (`%a %A %b %B %c %p %P %x %X`)
pub trait LocaleFormatter: Send + Sync {
    /// Locale name, for diagnostics
    fn name(&self) -> &str;

    /// Render one directive character as decoded text
    fn format(&self, directive: char, tm: &BrokenDownTime) -> Result<String, HostError>;
}

/// Civil view of an instant in the process timezone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub fields: CalendarFields,
    /// Seconds west of UTC in effect at the instant
    pub utc_offset: i32,
    /// `None` when the zone has no daylight saving rules or they are unknown
    pub dst: Option<bool>,
    pub zone: String,
}

/// Resolves instants against a timezone the core does not model itself
pub trait LocalTimeResolver: Send + Sync {
    fn resolve(&self, at: AtomicTime) -> Result<LocalTime, HostError>;

    /// Zone abbreviation for standard (`false`) or daylight (`true`) time
    fn zone_name(&self, dst: bool) -> Result<String, HostError>;
}
