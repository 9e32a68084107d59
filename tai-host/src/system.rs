//! The process timezone
//!
//! The platform timezone state (`tzset`) is initialised once per process
//! and only read afterwards. Zone abbreviations are looked up once and
//! memoized.

use crate::{HostError, LocalTime, LocalTimeResolver};
use std::sync::OnceLock;
use tai_core::calendar::{self, validate_offset};
use tai_core::AtomicTime;

/// Standard and daylight abbreviations of the process timezone
#[derive(Debug, Clone)]
struct ZoneNames {
    standard: String,
    daylight: Option<String>,
}

static ZONE_NAMES: OnceLock<ZoneNames> = OnceLock::new();

/// Local time as configured for the process (`TZ`, `/etc/localtime`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocalTime;

impl SystemLocalTime {
    pub fn new() -> Self {
        Self
    }

    fn zone_names(&self) -> &'static ZoneNames {
        ZONE_NAMES.get_or_init(|| {
            // Mid-January and mid-July of the current year cover both
            // hemispheres' daylight saving periods.
            let year = calendar::to_civil(AtomicTime::now(), 0).year;
            let mut names = ZoneNames {
                standard: "UTC".to_string(),
                daylight: None,
            };
            let mut have_standard = false;
            for month in [1, 7] {
                let Ok(at) = calendar::from_civil(year, month, 15, 12, 0, 0, 0, 0) else {
                    continue;
                };
                let Ok(local) = platform::localtime(at) else { continue };
                if local.dst == Some(true) {
                    names.daylight.get_or_insert(local.zone);
                } else if !have_standard {
                    names.standard = local.zone;
                    have_standard = true;
                }
            }
            tracing::debug!(
                standard = %names.standard,
                daylight = ?names.daylight,
                "process timezone names"
            );
            names
        })
    }
}

impl LocalTimeResolver for SystemLocalTime {
    fn resolve(&self, at: AtomicTime) -> Result<LocalTime, HostError> {
        let mut local = platform::localtime(at)?;
        local.dst = dst_flag(local.dst, self.zone_names());
        validate_offset(local.utc_offset).map_err(|e| HostError::LocalTimeUnavailable {
            reason: e.to_string(),
        })?;
        tracing::debug!(%at, zone = %local.zone, utc_offset = local.utc_offset, "resolved local time");
        Ok(local)
    }

    fn zone_name(&self, dst: bool) -> Result<String, HostError> {
        let names = self.zone_names();
        let name = match (dst, &names.daylight) {
            (true, Some(daylight)) => daylight,
            _ => &names.standard,
        };
        Ok(name.clone())
    }
}

/// A zone never observed in daylight saving time has no DST rules
fn dst_flag(reported: Option<bool>, names: &ZoneNames) -> Option<bool> {
    match (reported, &names.daylight) {
        (Some(true), _) => Some(true),
        (_, None) => None,
        (reported, Some(_)) => reported,
    }
}

#[cfg(unix)]
mod platform {
    use crate::{HostError, LocalTime};
    use std::ffi::CStr;
    use std::sync::Once;
    use tai_core::{AtomicTime, CalendarFields};

    static TZSET: Once = Once::new();

    // The libc crate does not bind tzset on every unix target.
    extern "C" {
        fn tzset();
    }

    pub(super) fn localtime(at: AtomicTime) -> Result<LocalTime, HostError> {
        TZSET.call_once(|| {
            // SAFETY: tzset reads TZ and the zone database into libc's
            // globals; Once keeps it to a single call.
            unsafe { tzset() };
            tracing::debug!("process timezone initialised");
        });

        let unix = at.unix_seconds();
        let t = libc::time_t::try_from(unix).map_err(|_| HostError::LocalTimeUnavailable {
            reason: format!("{} is outside the platform time_t range", unix),
        })?;

        // SAFETY: tm is plain data; localtime_r fills it or returns null.
        let mut tm: libc::tm = unsafe { std::mem::zeroed() };
        let filled = unsafe { libc::localtime_r(&t, &mut tm) };
        if filled.is_null() {
            return Err(HostError::LocalTimeUnavailable {
                reason: format!("localtime_r failed for {}", unix),
            });
        }

        let zone = if tm.tm_zone.is_null() {
            String::new()
        } else {
            // SAFETY: a non-null tm_zone points at a NUL-terminated static
            // abbreviation owned by libc.
            unsafe { CStr::from_ptr(tm.tm_zone) }.to_string_lossy().into_owned()
        };

        let fields = CalendarFields {
            year: tm.tm_year as i64 + 1900,
            month: (tm.tm_mon + 1) as u8,
            day: tm.tm_mday as u8,
            hour: tm.tm_hour as u8,
            minute: tm.tm_min as u8,
            // Leap-second aware zone files may report 60
            second: tm.tm_sec.min(59) as u8,
            nanosecond: at.nanosecond(),
            weekday: tm.tm_wday as u8,
            yearday: tm.tm_yday as u16,
        };

        Ok(LocalTime {
            fields,
            utc_offset: -(tm.tm_gmtoff as i32),
            dst: (tm.tm_isdst >= 0).then_some(tm.tm_isdst > 0),
            zone,
        })
    }
}

#[cfg(not(unix))]
mod platform {
    use crate::{HostError, LocalTime};
    use chrono::{Datelike, Local, TimeZone, Timelike};
    use tai_core::{AtomicTime, CalendarFields};

    pub(super) fn localtime(at: AtomicTime) -> Result<LocalTime, HostError> {
        let unix = at.unix_seconds();
        let secs = i64::try_from(unix).map_err(|_| HostError::LocalTimeUnavailable {
            reason: format!("{} is outside the i64 range", unix),
        })?;
        let dt = Local
            .timestamp_opt(secs, at.nanosecond())
            .single()
            .ok_or_else(|| HostError::LocalTimeUnavailable {
                reason: format!("no unique local time for {}", unix),
            })?;

        let fields = CalendarFields {
            year: dt.year() as i64,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second().min(59) as u8,
            nanosecond: at.nanosecond(),
            weekday: dt.weekday().num_days_from_sunday() as u8,
            yearday: dt.ordinal0() as u16,
        };

        Ok(LocalTime {
            fields,
            utc_offset: -dt.offset().local_minus_utc(),
            dst: None,
            zone: dt.format("%:z").to_string(),
        })
    }
}
