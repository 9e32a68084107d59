//! tai format - strftime-style rendering
//!
//! A format string is parsed once into literal runs and [`Directive`]s;
//! composite directives (`%D %F %r %R %T`) expand to fixed, pre-built item
//! sequences. The [`Formatter`] walks the items against a
//! [`CivilTime`](tai_core::CivilTime), deriving the timestamp and
//! weekday/year-day only for directives that use them.
//!
//! ```text
//! %a %A %b %B %c %p %P %x %X   locale formatter
//! %C %d %e %H %I %j %k %l %m   numeric fields
//! %M %S %u %w %y %Y %s
//! %g %G %V                     ISO-8601 week-based year and week
//! %U %W                        Sunday/Monday based week of the year
//! %z %Z                        UTC offset, zone name
//! %D %F %r %R %T %+            composites
//! %n %t %%                     newline, tab, percent
//! ```

mod directive;
mod parser;
mod render;

pub use directive::{Directive, Item};
pub use parser::parse;
pub use render::Formatter;

use tai_core::{codes, CoreError, TaiError};
use tai_host::HostError;
use thiserror::Error;

/// Formatting failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("unsupported directive %{directive}: {reason}")]
    UnsupportedDirective { directive: char, reason: &'static str },

    #[error("format string ends with a lone '%'")]
    TrailingEscape,

    #[error("%{directive}: {field} {value} out of range")]
    FieldOutOfRange {
        directive: char,
        field: &'static str,
        value: i64,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl From<FormatError> for TaiError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::UnsupportedDirective { directive, reason } => {
                TaiError::unsupported_directive(directive, reason)
            }
            FormatError::TrailingEscape => TaiError::new(codes::UNSUPPORTED_DIRECTIVE, err.to_string())
                .with_suggestion("Write %% for a literal percent sign"),
            FormatError::FieldOutOfRange { .. } => TaiError::invalid_civil_field(err.to_string()),
            FormatError::Core(e) => e.into(),
            FormatError::Host(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: TaiError = FormatError::UnsupportedDirective {
            directive: 'Q',
            reason: "unknown directive",
        }
        .into();
        assert_eq!(err.code, codes::UNSUPPORTED_DIRECTIVE);
        assert!(err.message.contains("%Q"));

        let err: TaiError = FormatError::TrailingEscape.into();
        assert_eq!(err.code, codes::UNSUPPORTED_DIRECTIVE);

        let err: TaiError = FormatError::FieldOutOfRange {
            directive: 'C',
            field: "year",
            value: 12_000,
        }
        .into();
        assert_eq!(err.code, codes::INVALID_CIVIL_FIELD);

        let err: TaiError = FormatError::Host(HostError::UnsupportedLocaleDirective('x')).into();
        assert_eq!(err.code, codes::LOCALE_DELEGATION_FAILURE);

        let err: TaiError = FormatError::Core(CoreError::TimestampOutOfRange).into();
        assert_eq!(err.code, codes::TIMESTAMP_OUT_OF_RANGE);
    }
}
