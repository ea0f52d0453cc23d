//! Core types for emogo check-in records.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Duration in seconds recorded for every vlog clip.
pub const DEFAULT_VLOG_DURATION_SECS: f64 = 1.0;

/// Overall sentiment reported in a questionnaire.
///
/// Labels are persisted and exported verbatim, so the `Display` output
/// matches the stored text exactly.
///
/// ```
/// use emogo_types::Sentiment;
///
/// assert_eq!(Sentiment::VeryPositive.to_string(), "Very Positive");
/// assert_eq!("very negative".parse::<Sentiment>().unwrap(), Sentiment::VeryNegative);
/// assert_eq!("very-negative".parse::<Sentiment>().unwrap(), Sentiment::VeryNegative);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sentiment {
    #[cfg_attr(feature = "serde", serde(rename = "Very Negative"))]
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    #[cfg_attr(feature = "serde", serde(rename = "Very Positive"))]
    VeryPositive,
}

impl Sentiment {
    /// All sentiments, from most negative to most positive.
    pub const ALL: [Sentiment; 5] = [
        Sentiment::VeryNegative,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Positive,
        Sentiment::VeryPositive,
    ];

    /// The stored label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::VeryNegative => "Very Negative",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
            Sentiment::VeryPositive => "Very Positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "sentiment" });
        }
        let wanted = normalize_label(s);
        Sentiment::ALL
            .into_iter()
            .find(|sentiment| normalize_label(sentiment.label()) == wanted)
            .ok_or_else(|| ValidationError::UnknownSentiment(s.to_string()))
    }
}

/// Mood reported in a questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mood {
    Stressed,
    Anxious,
    Sad,
    Neutral,
    Happy,
    Excited,
}

impl Mood {
    /// All moods in the order they are offered to the user.
    pub const ALL: [Mood; 6] = [
        Mood::Stressed,
        Mood::Anxious,
        Mood::Sad,
        Mood::Neutral,
        Mood::Happy,
        Mood::Excited,
    ];

    /// The stored label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Stressed => "Stressed",
            Mood::Anxious => "Anxious",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Happy => "Happy",
            Mood::Excited => "Excited",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "mood" });
        }
        let wanted = normalize_label(s);
        Mood::ALL
            .into_iter()
            .find(|mood| normalize_label(mood.label()) == wanted)
            .ok_or_else(|| ValidationError::UnknownMood(s.to_string()))
    }
}

/// Lowercase and collapse separators so "Very Negative", "very-negative"
/// and "very_negative" compare equal.
fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Self-reported energy level on a 1-10 scale.
///
/// ```
/// use emogo_types::Energy;
///
/// assert_eq!(Energy::default().value(), 5);
/// assert!(Energy::try_from(11).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub struct Energy(u8);

impl Energy {
    /// Lowest accepted energy.
    pub const MIN: u8 = 1;
    /// Highest accepted energy.
    pub const MAX: u8 = 10;
    /// Energy used when the caller does not provide one.
    pub const DEFAULT: Energy = Energy(5);

    /// The raw value (1-10).
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Energy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Energy {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Energy(value as u8))
        } else {
            Err(ValidationError::EnergyOutOfRange(value))
        }
    }
}

impl From<Energy> for i64 {
    fn from(energy: Energy) -> Self {
        i64::from(energy.0)
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three kinds of record the store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RecordKind {
    Questionnaire,
    Location,
    Vlog,
}

impl RecordKind {
    /// All kinds, in export order.
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Questionnaire,
        RecordKind::Location,
        RecordKind::Vlog,
    ];

    /// Name of the backing table. Also used as the export file prefix.
    #[must_use]
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Questionnaire => "questionnaire",
            RecordKind::Location => "location",
            RecordKind::Vlog => "vlog",
        }
    }

    /// Fixed CSV header line (without line terminator).
    #[must_use]
    pub fn csv_header(&self) -> &'static str {
        match self {
            RecordKind::Questionnaire => "ID,Sentiment,Mood,Energy,Timestamp",
            RecordKind::Location => "ID,Latitude,Longitude,Accuracy,Timestamp",
            RecordKind::Vlog => "ID,Filename,URI,Duration,Timestamp",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "questionnaire" | "questionnaires" | "sentiment" | "sentiments" => {
                Ok(RecordKind::Questionnaire)
            }
            "location" | "locations" => Ok(RecordKind::Location),
            "vlog" | "vlogs" => Ok(RecordKind::Vlog),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// A validated questionnaire ready to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewQuestionnaire {
    pub sentiment: Sentiment,
    pub mood: Mood,
    pub energy: Energy,
}

impl NewQuestionnaire {
    /// Build from typed values.
    #[must_use]
    pub fn new(sentiment: Sentiment, mood: Mood, energy: Energy) -> Self {
        Self {
            sentiment,
            mood,
            energy,
        }
    }

    /// Build from raw form input. A missing energy falls back to 5.
    ///
    /// ```
    /// use emogo_types::{Energy, NewQuestionnaire};
    ///
    /// let q = NewQuestionnaire::parse("Positive", "Happy", None).unwrap();
    /// assert_eq!(q.energy, Energy::default());
    /// assert!(NewQuestionnaire::parse("", "Happy", Some(3)).is_err());
    /// ```
    pub fn parse(
        sentiment: &str,
        mood: &str,
        energy: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let sentiment = sentiment.parse()?;
        let mood = mood.parse()?;
        let energy = energy.map(Energy::try_from).transpose()?.unwrap_or_default();
        Ok(Self::new(sentiment, mood, energy))
    }
}

/// A validated GPS fix ready to be inserted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the device reports one.
    pub accuracy: Option<f64>,
}

impl NewLocation {
    /// Validate and build a location fix.
    pub fn new(
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::OutOfRange {
                field: "latitude",
                value: latitude,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::OutOfRange {
                field: "longitude",
                value: longitude,
            });
        }
        if let Some(acc) = accuracy
            && (!acc.is_finite() || acc < 0.0)
        {
            return Err(ValidationError::OutOfRange {
                field: "accuracy",
                value: acc,
            });
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy,
        })
    }
}

/// Metadata for a recorded clip ready to be inserted.
///
/// The referenced file is not owned by the store: removing the row leaves
/// the file in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewVlog {
    pub filename: String,
    pub file_uri: String,
    pub duration_seconds: f64,
}

impl NewVlog {
    /// Validate and build vlog metadata.
    pub fn new(
        filename: impl Into<String>,
        file_uri: impl Into<String>,
        duration_seconds: f64,
    ) -> Result<Self, ValidationError> {
        let filename = filename.into();
        let file_uri = file_uri.into();
        if filename.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "filename" });
        }
        if file_uri.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "file_uri" });
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "duration",
                value: duration_seconds,
            });
        }
        Ok(Self {
            filename,
            file_uri,
            duration_seconds,
        })
    }

    /// Metadata for a standard one-second clip.
    pub fn clip(
        filename: impl Into<String>,
        file_uri: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(filename, file_uri, DEFAULT_VLOG_DURATION_SECS)
    }
}
