//! Reminders command - show the daily check-in schedule.

use anyhow::Result;
use time::OffsetDateTime;

use super::Session;
use crate::cli::OutputFormat;
use crate::format::{ReminderView, format_reminders_csv, format_reminders_text};

/// Execute the reminders command.
pub fn cmd_reminders(format: OutputFormat, session: &Session) -> Result<()> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let schedule = &session.config.reminders;
    let view = ReminderView::new(schedule, now);

    let formatted = match format {
        OutputFormat::Text => format_reminders_text(&view, &session.opts),
        OutputFormat::Json => session.opts.as_json(&view)?,
        OutputFormat::Csv => format_reminders_csv(schedule),
    };
    print!("{}", formatted);

    Ok(())
}
