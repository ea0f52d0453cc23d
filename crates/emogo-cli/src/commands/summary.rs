//! Summary command - record counts per kind.

use anyhow::Result;

use super::Session;
use crate::cli::OutputFormat;
use crate::format::{format_summary_csv, format_summary_text};

/// Execute the summary command.
///
/// Counts that fail to load are shown as zero and reported below the table.
pub async fn cmd_summary(format: OutputFormat, session: &Session) -> Result<()> {
    let store = session.store().await?;
    let report = store.summary().await;

    let formatted = match format {
        OutputFormat::Text => format_summary_text(&report, &session.opts),
        OutputFormat::Json => session.opts.as_json(&report)?,
        OutputFormat::Csv => format_summary_csv(&report),
    };
    print!("{}", formatted);

    Ok(())
}
