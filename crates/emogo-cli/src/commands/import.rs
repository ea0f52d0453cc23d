//! Import command - restore records from an exported CSV file.

use std::path::Path;

use anyhow::{Context, Result};
use emogo_types::RecordKind;

use super::Session;
use crate::cli::OutputFormat;
use crate::format::format_import_text;

/// Execute the import command.
pub async fn cmd_import(
    kind: RecordKind,
    file: &Path,
    format: OutputFormat,
    session: &Session,
) -> Result<()> {
    let data = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let store = session.store().await?;
    let result = store
        .import_csv(kind, data)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;

    match format {
        OutputFormat::Json => print!("{}", session.opts.as_json(&result)?),
        OutputFormat::Text | OutputFormat::Csv => print!("{}", format_import_text(&result)),
    }

    Ok(())
}
