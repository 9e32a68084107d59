//! Errors for tai
//!
//! `CoreError` covers failures of the pure time arithmetic. `TaiError` is the
//! structured, serializable error every crate error converts into; it is what
//! the facade and the command line surface to callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_NUMERIC_INPUT: &str = "INVALID_NUMERIC_INPUT";
    pub const INVALID_CIVIL_FIELD: &str = "INVALID_CIVIL_FIELD";
    pub const UNSUPPORTED_DIRECTIVE: &str = "UNSUPPORTED_DIRECTIVE";
    pub const TIMESTAMP_OUT_OF_RANGE: &str = "TIMESTAMP_OUT_OF_RANGE";
    pub const LOCALE_DELEGATION_FAILURE: &str = "LOCALE_DELEGATION_FAILURE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error type for atomic time and calendar operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid numeric input: {0} is not a finite timestamp")]
    InvalidNumericInput(f64),

    #[error("Invalid civil field: {field} = {value} (expected {expected})")]
    InvalidCivilField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Timestamp out of representable range")]
    TimestampOutOfRange,
}

impl CoreError {
    pub(crate) fn civil_field(
        field: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::InvalidCivilField {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The request failed; other requests are unaffected
    Error,
    /// A bug or broken environment; the caller should stop
    Fatal,
}

/// Structured error surfaced by the facade and the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaiError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl TaiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn invalid_numeric_input(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_NUMERIC_INPUT, details)
            .with_suggestion("Pass a finite number of seconds since 1970-01-01T00:00:00Z")
    }

    pub fn invalid_civil_field(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_CIVIL_FIELD, details).with_suggestion(
            "Check date components (month 1-12, day within month, hour 0-23, minute 0-59, second below 60)",
        )
    }

    pub fn unsupported_directive(directive: char, details: impl Into<String>) -> Self {
        Self::new(
            codes::UNSUPPORTED_DIRECTIVE,
            format!("Unsupported directive %{}: {}", directive, details.into()),
        )
        .with_suggestion("Use a supported strftime directive such as %Y or %H, or %% for a literal percent")
    }

    pub fn out_of_range() -> Self {
        Self::new(codes::TIMESTAMP_OUT_OF_RANGE, "Timestamp out of representable range")
            .with_suggestion("Keep timestamps within the signed 64-bit second range")
    }

    pub fn locale_delegation(details: impl Into<String>) -> Self {
        Self::new(codes::LOCALE_DELEGATION_FAILURE, details)
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for TaiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for TaiError {}

impl From<CoreError> for TaiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::InvalidNumericInput(_) => Self::invalid_numeric_input(err.to_string()),
            CoreError::InvalidCivilField { .. } => Self::invalid_civil_field(err.to_string()),
            CoreError::TimestampOutOfRange => Self::out_of_range(),
        }
    }
}
