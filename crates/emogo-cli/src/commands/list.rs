//! List command - show stored records of one kind.

use anyhow::Result;
use emogo_store::{location_csv, questionnaire_csv, vlog_csv};
use emogo_types::RecordKind;

use super::Session;
use crate::cli::OutputFormat;
use crate::format::{format_locations_text, format_questionnaires_text, format_vlogs_text};

/// Execute the list command.
pub async fn cmd_list(
    kind: RecordKind,
    format: OutputFormat,
    limit: usize,
    session: &Session,
) -> Result<()> {
    let store = session.store().await?;
    let opts = &session.opts;

    let formatted = match kind {
        RecordKind::Questionnaire => {
            let records = truncate(store.list_questionnaires().await?, limit);
            match format {
                OutputFormat::Text => format_questionnaires_text(&records, opts),
                OutputFormat::Json => opts.as_json(&records)?,
                OutputFormat::Csv => questionnaire_csv(&records)?,
            }
        }
        RecordKind::Location => {
            let records = truncate(store.list_locations().await?, limit);
            match format {
                OutputFormat::Text => format_locations_text(&records, opts),
                OutputFormat::Json => opts.as_json(&records)?,
                OutputFormat::Csv => location_csv(&records)?,
            }
        }
        RecordKind::Vlog => {
            let records = truncate(store.list_vlogs().await?, limit);
            match format {
                OutputFormat::Text => format_vlogs_text(&records, opts),
                OutputFormat::Json => opts.as_json(&records)?,
                OutputFormat::Csv => vlog_csv(&records)?,
            }
        }
    };

    print!("{}", formatted);
    Ok(())
}

fn truncate<T>(mut records: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        records.truncate(limit);
    }
    records
}
