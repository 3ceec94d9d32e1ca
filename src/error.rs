// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy shared by every value type in the crate.
//!
//! All failures are raised synchronously at the point of violation.  The
//! variants mirror the kinds a caller may want to react to differently:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`Error::Range`] | a numeric field is outside its valid domain |
//! | [`Error::Parse`] | text does not match a value type's grammar |
//! | [`Error::Format`] | a zone identifier violates the zone-ID grammar |
//! | [`Error::UnknownZone`] | a well-formed region ID has no rules |
//! | [`Error::CalendarMismatch`] | an ISO amount is applied to a non-ISO target |
//! | [`Error::Overflow`] | arithmetic would leave the representable range |
//! | [`Error::Unsupported`] | a unit query is not supported by the value |

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by construction, parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A numeric field lies outside its declared range.
    #[error("{0}")]
    Range(String),

    /// Text could not be parsed into the requested value type.
    #[error("{reason}: {text}")]
    Parse { text: String, reason: String },

    /// A zone identifier does not match the zone-ID grammar.
    #[error("{reason}: {id}")]
    Format { id: String, reason: String },

    /// The region ID is well formed but the rule provider does not know it.
    #[error("Unknown time-zone ID: {0}")]
    UnknownZone(String),

    /// An ISO-only amount was applied to a value of another calendar system.
    #[error("Chronology mismatch, expected: {expected}, actual: {actual}")]
    CalendarMismatch { expected: String, actual: String },

    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// The requested unit or field is not supported by the value.
    #[error("Unsupported unit: {0}")]
    Unsupported(String),

    /// A lower-level error re-raised with additional context.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn range(message: impl Into<String>) -> Self {
        Self::Range(message.into())
    }

    pub(crate) fn parse(text: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            text: text.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn format(id: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            id: id.to_owned(),
            reason: reason.into(),
        }
    }

    /// Out-of-range error in the `"<field> not in valid range: value … is not
    /// in the range … to …"` shape shared by every bounded field.
    pub(crate) fn field_range(field: &str, value: i64, min: i64, max: i64) -> Self {
        Self::Range(format!(
            "{field} not in valid range: value {value} is not in the range {min} to {max}"
        ))
    }

    /// Wrap `self` with an explanatory message, keeping it as the source.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any [`Error::Context`] layers.
    pub fn root(&self) -> &Error {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self.root(), Self::Range(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.root(), Self::Parse { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self.root(), Self::Format { .. })
    }

    pub fn is_unknown_zone(&self) -> bool {
        matches!(self.root(), Self::UnknownZone(_))
    }

    pub fn is_calendar_mismatch(&self) -> bool {
        matches!(self.root(), Self::CalendarMismatch { .. })
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self.root(), Self::Overflow(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.root(), Self::Unsupported(_))
    }
}
