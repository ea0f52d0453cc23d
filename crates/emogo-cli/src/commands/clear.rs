//! Clear command - delete every stored record.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, theme::ColorfulTheme};

use super::Session;

/// Execute the clear command.
///
/// Without `--yes` this asks for confirmation, and refuses to run when no
/// terminal is attached.
pub async fn cmd_clear(yes: bool, session: &Session) -> Result<()> {
    if !yes {
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            bail!("Refusing to delete all data without confirmation. Re-run with --yes.");
        }

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("This will delete all data. This action cannot be undone. Continue?")
            .default(false)
            .interact()
            .context("Failed to get user confirmation")?;

        if !confirmed {
            session.note("Cancelled.");
            return Ok(());
        }
    }

    let store = session.store().await?;
    let removed = store.clear_all().await.context("Failed to clear data")?;

    session.note(format!(
        "Deleted {} questionnaires, {} locations, {} vlogs.",
        removed.questionnaire_count, removed.location_count, removed.vlog_count
    ));
    Ok(())
}
