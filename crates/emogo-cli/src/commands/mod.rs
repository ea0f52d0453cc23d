//! Command implementations for the CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use emogo_store::RecordStore;

use crate::config::Config;
use crate::format::FormatOptions;

mod clear;
mod config;
mod export;
mod import;
mod list;
mod record;
mod reminders;
mod summary;

pub use clear::cmd_clear;
pub use config::cmd_config;
pub use export::{ExportArgs, cmd_export};
pub use import::cmd_import;
pub use list::cmd_list;
pub use record::cmd_record;
pub use reminders::cmd_reminders;
pub use summary::cmd_summary;

/// State shared by every command.
pub struct Session {
    pub config: Config,
    pub db_path: PathBuf,
    pub opts: FormatOptions,
    pub quiet: bool,
}

impl Session {
    /// The process-wide store handle, opened on first use.
    pub async fn store(&self) -> Result<RecordStore> {
        RecordStore::global(&self.db_path, self.config.open_timeout())
            .await
            .with_context(|| format!("Failed to open database {}", self.db_path.display()))
    }

    /// Print a status line unless `--quiet` was given.
    pub fn note(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}
