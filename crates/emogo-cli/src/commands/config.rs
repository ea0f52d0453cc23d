//! Config command - inspect and initialize the configuration file.

use anyhow::{Result, bail};

use super::Session;
use crate::cli::ConfigAction;
use crate::config::Config;

/// Execute the config command.
pub fn cmd_config(action: ConfigAction, session: &Session) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&session.config)?;
            println!("# {}", Config::path().display());
            println!("# database in use: {}", session.db_path.display());
            print!("{}", content);
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
        ConfigAction::Init { force } => {
            let path = Config::path();
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save_to(&path)?;
            session.note(format!("Created config file at {}", path.display()));
        }
    }
    Ok(())
}
