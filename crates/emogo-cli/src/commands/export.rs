//! Export command - write CSV files and hand them to the share command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use emogo_store::Exporter;

use super::Session;
use crate::cli::OutputFormat;
use crate::format::{format_export_csv, format_export_text};
use crate::share::CommandShare;

/// Arguments for the export command.
pub struct ExportArgs {
    pub dir: Option<PathBuf>,
    pub no_share: bool,
    pub format: OutputFormat,
}

/// Execute the export command.
pub async fn cmd_export(args: ExportArgs, session: &Session) -> Result<()> {
    let store = session.store().await?;
    let dir = session.config.resolve_export_dir(args.dir);

    let mut exporter = Exporter::new(&dir);
    if !args.no_share
        && let Some(share) = CommandShare::from_command(&session.config.share_command)
    {
        exporter = exporter.with_share(Arc::new(share));
    }

    let report = exporter
        .export_all(&store)
        .await
        .with_context(|| format!("Failed to export to {}", dir.display()))?;

    let formatted = match args.format {
        OutputFormat::Text => format_export_text(&report, &session.opts),
        OutputFormat::Json => session.opts.as_json(&report)?,
        OutputFormat::Csv => format_export_csv(&report),
    };
    print!("{}", formatted);

    Ok(())
}
