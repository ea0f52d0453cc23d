//! Output formatting for records, summaries and reports.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use emogo_store::{
    ExportReport, ImportResult, LocationRecord, QuestionnaireRecord, SummaryReport, VlogRecord,
};
use emogo_types::{CheckIn, REMINDER_TITLE};

use crate::cli::StyleMode;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl FormatOptions {
    pub fn new(no_color: bool, compact: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        Self {
            no_color: no_color || style == StyleMode::Plain,
            compact,
            style,
        }
    }

    /// Serialize to JSON, respecting the compact flag.
    pub fn as_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn title(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("{}", text.bold())
        }
    }

    fn table(&self, builder: Builder) -> String {
        use tabled::settings::Style;

        let mut table = builder.build();
        match self.style {
            StyleMode::Rich => table.with(Style::rounded()),
            StyleMode::Plain => table.with(Style::blank()),
        };
        table.to_string()
    }
}

/// Local time for display, `YYYY-MM-DD HH:MM:SS`.
fn display_time(at: OffsetDateTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let local = at.to_offset(offset);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        local.year(),
        u8::from(local.month()),
        local.day(),
        local.hour(),
        local.minute(),
        local.second()
    )
}

fn empty_message(kind: &str, opts: &FormatOptions) -> String {
    let text = format!("No {kind} recorded yet.");
    if opts.no_color {
        format!("{text}\n")
    } else {
        format!("{}\n", text.dimmed())
    }
}

// ============================================================================
// Record lists
// ============================================================================

#[must_use]
pub fn format_questionnaires_text(records: &[QuestionnaireRecord], opts: &FormatOptions) -> String {
    if records.is_empty() {
        return empty_message("questionnaires", opts);
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Time", "Sentiment", "Mood", "Energy"]);
    for r in records {
        builder.push_record([
            r.id.to_string(),
            display_time(r.captured_at),
            r.sentiment.to_string(),
            r.mood.to_string(),
            format!("{}/10", r.energy),
        ]);
    }

    format!("{}\n{}\n", opts.title("Questionnaires"), opts.table(builder))
}

#[must_use]
pub fn format_locations_text(records: &[LocationRecord], opts: &FormatOptions) -> String {
    if records.is_empty() {
        return empty_message("locations", opts);
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Time", "Latitude", "Longitude", "Accuracy"]);
    for r in records {
        builder.push_record([
            r.id.to_string(),
            display_time(r.captured_at),
            format!("{:.6}", r.latitude),
            format!("{:.6}", r.longitude),
            r.accuracy
                .map(|a| format!("{:.0} m", a))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    format!("{}\n{}\n", opts.title("Recent locations"), opts.table(builder))
}

#[must_use]
pub fn format_vlogs_text(records: &[VlogRecord], opts: &FormatOptions) -> String {
    if records.is_empty() {
        return empty_message("vlogs", opts);
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Time", "File", "Duration"]);
    for r in records {
        builder.push_record([
            r.id.to_string(),
            display_time(r.captured_at),
            r.filename.clone(),
            format!("{}s", r.duration_seconds),
        ]);
    }

    format!("{}\n{}\n", opts.title("Vlogs"), opts.table(builder))
}

// ============================================================================
// Summary
// ============================================================================

#[must_use]
pub fn format_summary_text(report: &SummaryReport, opts: &FormatOptions) -> String {
    let summary = &report.summary;
    let mut builder = Builder::default();
    builder.push_record(["Kind", "Count"]);
    builder.push_record(["Sentiment records", &summary.questionnaire_count.to_string()]);
    builder.push_record(["Vlogs", &summary.vlog_count.to_string()]);
    builder.push_record(["GPS locations", &summary.location_count.to_string()]);

    let mut out = format!("{}\n{}\n", opts.title("Data summary"), opts.table(builder));
    for (kind, reason) in &report.failed {
        let line = format!("Could not count {kind} records: {reason}");
        if opts.no_color {
            out.push_str(&format!("{line}\n"));
        } else {
            out.push_str(&format!("{}\n", line.yellow()));
        }
    }
    out
}

#[must_use]
pub fn format_summary_csv(report: &SummaryReport) -> String {
    let s = &report.summary;
    format!(
        "questionnaire_count,location_count,vlog_count\n{},{},{}\n",
        s.questionnaire_count, s.location_count, s.vlog_count
    )
}

// ============================================================================
// Export / import
// ============================================================================

#[must_use]
pub fn format_export_text(report: &ExportReport, opts: &FormatOptions) -> String {
    if report.files.is_empty() {
        return "No data to export.\n".to_string();
    }

    let s = &report.summary;
    let mut out = format!(
        "{}\n",
        opts.title(&format!(
            "Exported {} questionnaires, {} locations, {} vlogs",
            s.questionnaire_count, s.location_count, s.vlog_count
        ))
    );
    for path in &report.files {
        out.push_str(&format!("  {}\n", path.display()));
    }
    out
}

#[must_use]
pub fn format_export_csv(report: &ExportReport) -> String {
    let mut out = String::from("file\n");
    for path in &report.files {
        out.push_str(&format!("\"{}\"\n", path.display().to_string().replace('"', "\"\"")));
    }
    out
}

#[must_use]
pub fn format_import_text(result: &ImportResult) -> String {
    let mut out = format!("Imported {} of {} rows\n", result.imported, result.total);
    for error in &result.errors {
        out.push_str(&format!("  skipped {}\n", error));
    }
    out
}

// ============================================================================
// Reminders
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ReminderView<'a> {
    pub title: &'static str,
    pub schedule: &'a [CheckIn],
    #[serde(with = "time::serde::rfc3339::option")]
    pub next_at: Option<OffsetDateTime>,
    pub next: Option<&'a CheckIn>,
}

impl<'a> ReminderView<'a> {
    pub fn new(schedule: &'a [CheckIn], now: OffsetDateTime) -> Self {
        let next = emogo_types::next_check_in(schedule, now);
        Self {
            title: REMINDER_TITLE,
            schedule,
            next_at: next.map(|(at, _)| at),
            next: next.map(|(_, c)| c),
        }
    }
}

#[must_use]
pub fn format_reminders_text(view: &ReminderView<'_>, opts: &FormatOptions) -> String {
    if view.schedule.is_empty() {
        return "No reminders configured.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Time", "Reminder"]);
    for check_in in view.schedule {
        builder.push_record([
            format!("{:02}:{:02}", check_in.at.hour(), check_in.at.minute()),
            check_in.message(),
        ]);
    }

    let mut out = format!("{}\n{}\n", opts.title(view.title), opts.table(builder));
    if let (Some(at), Some(next)) = (view.next_at, view.next) {
        let when = at.format(&Rfc3339).unwrap_or_else(|_| next.to_string());
        out.push_str(&format!("Next: {} ({})\n", next.label, when));
    }
    out
}

#[must_use]
pub fn format_reminders_csv(schedule: &[CheckIn]) -> String {
    let mut out = String::from("time,label,message\n");
    for c in schedule {
        out.push_str(&format!(
            "{:02}:{:02},\"{}\",\"{}\"\n",
            c.at.hour(),
            c.at.minute(),
            c.label.replace('"', "\"\""),
            c.message().replace('"', "\"\"")
        ));
    }
    out
}
