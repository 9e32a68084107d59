//! Fixed-offset timezone

use crate::{HostError, LocalTime, LocalTimeResolver};
use tai_core::calendar::{self, validate_offset};
use tai_core::AtomicTime;

/// A zone with one constant offset and no daylight saving time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOffset {
    utc_offset: i32,
    zone: String,
}

impl FixedOffset {
    /// `utc_offset` is in seconds west of UTC
    pub fn new(utc_offset: i32, zone: impl Into<String>) -> Result<Self, HostError> {
        validate_offset(utc_offset).map_err(|e| HostError::LocalTimeUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self {
            utc_offset,
            zone: zone.into(),
        })
    }

    pub fn utc() -> Self {
        Self {
            utc_offset: 0,
            zone: "UTC".to_string(),
        }
    }

    pub fn utc_offset(&self) -> i32 {
        self.utc_offset
    }
}

impl LocalTimeResolver for FixedOffset {
    fn resolve(&self, at: AtomicTime) -> Result<LocalTime, HostError> {
        Ok(LocalTime {
            fields: calendar::to_civil(at, self.utc_offset),
            utc_offset: self.utc_offset,
            dst: None,
            zone: self.zone.clone(),
        })
    }

    fn zone_name(&self, _dst: bool) -> Result<String, HostError> {
        Ok(self.zone.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let cet = FixedOffset::new(-3600, "CET").unwrap();
        let local = cet.resolve(AtomicTime::from_unix_seconds(0.0).unwrap()).unwrap();
        assert_eq!((local.fields.year, local.fields.hour), (1970, 1));
        assert_eq!(local.utc_offset, -3600);
        assert_eq!(local.dst, None);
        assert_eq!(local.zone, "CET");
        assert_eq!(cet.zone_name(true).unwrap(), "CET");
    }

    #[test]
    fn test_rejects_huge_offset() {
        assert!(FixedOffset::new(90_000, "X").is_err());
        assert_eq!(FixedOffset::utc().utc_offset(), 0);
    }
}
