//! Error types for input validation in emogo-types.

use thiserror::Error;

/// Errors raised when a caller supplies an incomplete or out-of-range record.
///
/// Validation happens when a draft record is built, so a value of this type
/// never reaches the storage layer.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required text field was empty or whitespace.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The sentiment label is not one of the five known labels.
    #[error("unknown sentiment '{0}'")]
    UnknownSentiment(String),

    /// The mood label is not one of the six known labels.
    #[error("unknown mood '{0}'")]
    UnknownMood(String),

    /// Energy must be between 1 and 10 inclusive.
    #[error("energy must be between 1 and 10, got {0}")]
    EnergyOutOfRange(i64),

    /// A coordinate or measurement was outside its valid range.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The record kind name is not recognized.
    #[error("unknown record kind '{0}', expected questionnaire, location or vlog")]
    UnknownKind(String),

    /// A reminder time could not be parsed.
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),
}

/// Result type alias using emogo-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
