//! Platform-agnostic types for emogo check-in records.
//!
//! This crate provides the shared vocabulary used by the record store and
//! any capture surface (mobile screens, the CLI).
//!
//! # Features
//!
//! - Enumerated questionnaire answers (sentiment, mood, energy)
//! - Validated draft records for questionnaires, GPS fixes and vlog clips
//! - Record kinds with their fixed CSV headers
//! - The daily check-in reminder schedule
//!
//! # Example
//!
//! ```
//! use emogo_types::{Mood, NewQuestionnaire, Sentiment};
//!
//! let draft = NewQuestionnaire::parse("Very Positive", "Excited", Some(8))?;
//! assert_eq!(draft.sentiment, Sentiment::VeryPositive);
//! assert_eq!(draft.mood, Mood::Excited);
//! # Ok::<(), emogo_types::ValidationError>(())
//! ```

pub mod error;
pub mod schedule;
pub mod types;

pub use error::{ValidationError, ValidationResult};
pub use schedule::{CheckIn, REMINDER_TITLE, default_schedule, next_check_in, parse_time_of_day};
pub use types::{
    DEFAULT_VLOG_DURATION_SECS, Energy, Mood, NewLocation, NewQuestionnaire, NewVlog, RecordKind,
    Sentiment,
};
