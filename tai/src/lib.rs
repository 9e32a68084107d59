//! tai - atomic time and civil calendars
//!
//! The entry points are on [`Tai`]:
//! - `decompose`: timestamp to civil fields, at a fixed offset or in local time
//! - `compose`: civil fields to timestamp
//! - `render`: civil fields or a timestamp through a strftime-style format

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tai_core::calendar;

pub use tai_core::{
    codes, AtomicTime, CivilFields, CivilTime, CoreError, IsoWeek, Severity, TaiError,
};
pub use tai_format::{FormatError, Formatter};
pub use tai_host::{
    BrokenDownTime, CLocale, FixedOffset, HostError, LocalTime, LocalTimeResolver,
    LocaleFormatter, SystemLocalTime,
};

/// Which UTC offset a decomposition uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetMode {
    /// Seconds west of UTC
    Fixed(i32),
    /// Whatever the local time resolver reports for the instant
    Local,
}

impl FromStr for OffsetMode {
    type Err = TaiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "local" {
            return Ok(OffsetMode::Local);
        }
        s.parse::<i32>()
            .map(OffsetMode::Fixed)
            .map_err(|_| TaiError::parse_error(format!("offset '{}' is neither 'local' nor an integer", s)))
    }
}

impl fmt::Display for OffsetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetMode::Fixed(offset) => write!(f, "{}", offset),
            OffsetMode::Local => write!(f, "local"),
        }
    }
}

/// What `render` formats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderInput {
    /// Seconds since 1970-01-01T00:00:00Z, shown in local time
    Stamp(f64),
    Civil(CivilFields),
}

/// Main tai engine
pub struct Tai {
    locale: Arc<dyn LocaleFormatter>,
    resolver: Arc<dyn LocalTimeResolver>,
}

impl Tai {
    /// C locale and the process timezone
    pub fn new() -> Self {
        Self {
            locale: Arc::new(CLocale),
            resolver: Arc::new(SystemLocalTime::new()),
        }
    }

    pub fn with_locale(mut self, locale: impl LocaleFormatter + 'static) -> Self {
        self.locale = Arc::new(locale);
        self
    }

    pub fn with_resolver(mut self, resolver: impl LocalTimeResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn locale_name(&self) -> &str {
        self.locale.name()
    }

    /// Break a timestamp into civil fields
    ///
    /// In local mode the zone name and DST flag come from the resolver; at a
    /// fixed offset both stay unspecified.
    pub fn decompose(&self, stamp: f64, mode: OffsetMode) -> Result<CivilTime, TaiError> {
        let at = AtomicTime::from_unix_seconds(stamp)?;
        match mode {
            OffsetMode::Fixed(offset) => Ok(CivilTime::from_atomic(at, offset)?),
            OffsetMode::Local => self.decompose_local(at),
        }
    }

    fn decompose_local(&self, at: AtomicTime) -> Result<CivilTime, TaiError> {
        let local = self.resolver.resolve(at)?;
        let mut civil = CivilTime::from_calendar(local.fields, local.utc_offset, at)?;
        if !local.zone.is_empty() {
            civil = civil.with_zone(local.zone);
        }
        if let Some(dst) = local.dst {
            civil = civil.with_dst(dst);
        }
        Ok(civil)
    }

    /// Timestamp denoted by civil fields
    ///
    /// An unspecified offset means local time: the offset in effect at that
    /// wall-clock time is looked up through the resolver.
    pub fn compose(&self, fields: &CivilFields) -> Result<f64, TaiError> {
        let mut civil = self.civil_from_fields(fields.clone())?;
        Ok(civil.timestamp()?)
    }

    /// Render civil fields or a timestamp
    pub fn render(&self, format: &str, input: RenderInput) -> Result<String, TaiError> {
        let mut civil = match input {
            RenderInput::Stamp(stamp) => self.decompose(stamp, OffsetMode::Local)?,
            RenderInput::Civil(fields) => self.civil_from_fields(fields)?,
        };
        self.format(format, &mut civil)
    }

    /// Render an existing civil time, reusing and extending its caches
    pub fn format(&self, format: &str, civil: &mut CivilTime) -> Result<String, TaiError> {
        let formatter = Formatter::new(self.locale.as_ref(), self.resolver.as_ref());
        Ok(formatter.format(format, civil)?)
    }

    fn civil_from_fields(&self, mut fields: CivilFields) -> Result<CivilTime, TaiError> {
        if fields.utc_offset.is_none() {
            fields.utc_offset = Some(self.local_offset(&fields)?);
        }
        Ok(CivilTime::try_from(fields)?)
    }

    /// Offset of the local zone at a wall-clock time
    ///
    /// Reads the wall clock as UTC, asks for the offset there, recomposes with
    /// it and asks again. The second answer wins when the two straddle a
    /// transition.
    fn local_offset(&self, fields: &CivilFields) -> Result<i32, TaiError> {
        let compose_at = |offset: i32| -> Result<AtomicTime, TaiError> {
            let mut civil = CivilTime::new(
                fields.year,
                fields.month,
                fields.day,
                fields.hour,
                fields.minute,
                fields.second,
                offset,
            )?;
            Ok(civil.ensure_timestamp()?)
        };

        let guess = compose_at(0)?;
        let first = self.resolver.resolve(guess)?.utc_offset;
        let second = self.resolver.resolve(compose_at(first)?)?.utc_offset;
        if first != second {
            tracing::debug!(first, second, "local offset changes near wall-clock time");
        }
        calendar::validate_offset(second)?;
        Ok(second)
    }
}

impl Default for Tai {
    fn default() -> Self {
        Self::new()
    }
}
