//! Daily check-in reminder schedule.
//!
//! Only the schedule itself lives here. Delivering a notification at the
//! scheduled time is the job of the host platform.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::macros::time;
use time::{Duration, OffsetDateTime, Time};

use crate::error::ValidationError;

/// Title shown on every reminder.
pub const REMINDER_TITLE: &str = "Time to share your experience";

/// A reminder that repeats every day at a fixed local time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CheckIn {
    /// Time of day, `HH:MM`.
    #[cfg_attr(feature = "serde", serde(with = "time_of_day"))]
    pub at: Time,
    /// Short label such as "Morning".
    pub label: String,
}

impl CheckIn {
    /// Create a check-in at `hour:minute`.
    pub fn new(hour: u8, minute: u8, label: impl Into<String>) -> Result<Self, ValidationError> {
        let at = Time::from_hms(hour, minute, 0)
            .map_err(|_| ValidationError::InvalidTimeOfDay(format!("{hour:02}:{minute:02}")))?;
        Ok(Self {
            at,
            label: label.into(),
        })
    }

    /// Notification body for this check-in.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} check-in: Share your sentiment, vlog, and location!",
            self.label
        )
    }
}

impl fmt::Display for CheckIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {}",
            self.at.hour(),
            self.at.minute(),
            self.label
        )
    }
}

/// The three default daily check-ins: 08:00, 13:00 and 18:00.
#[must_use]
pub fn default_schedule() -> Vec<CheckIn> {
    vec![
        CheckIn {
            at: time!(8:00),
            label: "Morning".to_string(),
        },
        CheckIn {
            at: time!(13:00),
            label: "Afternoon".to_string(),
        },
        CheckIn {
            at: time!(18:00),
            label: "Evening".to_string(),
        },
    ]
}

/// Parse `HH:MM` into a time of day.
///
/// ```
/// use emogo_types::parse_time_of_day;
///
/// let t = parse_time_of_day("13:05").unwrap();
/// assert_eq!((t.hour(), t.minute()), (13, 5));
/// assert!(parse_time_of_day("25:00").is_err());
/// ```
pub fn parse_time_of_day(s: &str) -> Result<Time, ValidationError> {
    let invalid = || ValidationError::InvalidTimeOfDay(s.to_string());
    let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u8 = hour.parse().map_err(|_| invalid())?;
    let minute: u8 = minute.parse().map_err(|_| invalid())?;
    Time::from_hms(hour, minute, 0).map_err(|_| invalid())
}

/// Find the next check-in strictly after `now`.
///
/// Wraps around to the earliest check-in of the following day. Returns
/// `None` for an empty schedule.
pub fn next_check_in(
    schedule: &[CheckIn],
    now: OffsetDateTime,
) -> Option<(OffsetDateTime, &CheckIn)> {
    let today = schedule
        .iter()
        .filter(|c| c.at > now.time())
        .min_by_key(|c| c.at)
        .map(|c| (now.replace_time(c.at), c));

    today.or_else(|| {
        schedule
            .iter()
            .min_by_key(|c| c.at)
            .map(|c| ((now + Duration::days(1)).replace_time(c.at), c))
    })
}

#[cfg(feature = "serde")]
mod time_of_day {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;

    pub fn serialize<S: Serializer>(t: &Time, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{:02}:{:02}", t.hour(), t.minute()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Time, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}
