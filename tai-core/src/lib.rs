//! tai core - fundamental time types
//!
//! This crate provides the pure computations behind tai:
//! - `AtomicTime`: continuous, leap-second-free fixed-point time
//! - `calendar`: proleptic Gregorian conversion to and from civil fields
//! - `CivilTime`: civil fields with lazily derived timestamp and weekday
//! - `iso_week`: ISO-8601 week numbering
//! - `TaiError`: structured errors for callers

mod atomic;
pub mod calendar;
mod civil;
mod error;
pub mod iso_week;

pub use atomic::{AtomicTime, NANOS_PER_SECOND, UNIX_EPOCH_OFFSET};
pub use calendar::CalendarFields;
pub use civil::{CivilFields, CivilTime, WeekdayYearday};
pub use error::{codes, CoreError, Severity, TaiError};
pub use iso_week::{iso_week, IsoWeek};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{AtomicTime, CivilFields, CivilTime, CoreError, IsoWeek, TaiError};
}
