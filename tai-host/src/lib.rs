//! tai host - the collaborators tai borrows from its environment
//!
//! - `LocaleFormatter`: locale-dependent names and layouts (`CLocale`)
//! - `LocalTimeResolver`: the timezone rules of the process (`SystemLocalTime`)
//!   or a constant offset (`FixedOffset`)

mod fixed;
mod locale;
mod system;
mod traits;

pub use fixed::FixedOffset;
pub use locale::{asctime, CLocale};
pub use system::SystemLocalTime;
pub use traits::{BrokenDownTime, LocalTime, LocalTimeResolver, LocaleFormatter};

use tai_core::TaiError;
use thiserror::Error;

/// Failures reported by host collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("locale cannot render %{0}")]
    UnsupportedLocaleDirective(char),

    #[error("%{directive}: {field} out of range")]
    InvalidField { directive: char, field: &'static str },

    #[error("local time unavailable: {reason}")]
    LocalTimeUnavailable { reason: String },
}

impl From<HostError> for TaiError {
    fn from(err: HostError) -> Self {
        TaiError::locale_delegation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tai_core::codes;

    #[test]
    fn test_host_error_code() {
        let err: TaiError = HostError::UnsupportedLocaleDirective('Q').into();
        assert_eq!(err.code, codes::LOCALE_DELEGATION_FAILURE);
        assert_eq!(err.message, "locale cannot render %Q");
    }
}
