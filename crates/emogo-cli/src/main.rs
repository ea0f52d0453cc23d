use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod share;

use cli::{Cli, Commands};
use commands::{
    ExportArgs, Session, cmd_clear, cmd_config, cmd_export, cmd_import, cmd_list, cmd_record,
    cmd_reminders, cmd_summary,
};
use config::Config;
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "emogo", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let session = Session {
        db_path: config.resolve_db_path(cli.db),
        opts: FormatOptions::new(cli.no_color, cli.compact, cli.style),
        quiet: cli.quiet,
        config,
    };

    match cli.command {
        Commands::Record { entry } => cmd_record(entry, &session).await,
        Commands::List {
            kind,
            output,
            limit,
        } => cmd_list(kind, output.format, limit, &session).await,
        Commands::Summary { output } => cmd_summary(output.format, &session).await,
        Commands::Export {
            dir,
            no_share,
            output,
        } => {
            let args = ExportArgs {
                dir,
                no_share,
                format: output.format,
            };
            cmd_export(args, &session).await
        }
        Commands::Import { kind, file, output } => {
            cmd_import(kind, &file, output.format, &session).await
        }
        Commands::Clear { yes } => cmd_clear(yes, &session).await,
        Commands::Reminders { output } => cmd_reminders(output.format, &session),
        Commands::Config { action } => cmd_config(action, &session),
        // Handled before tracing init
        Commands::Completions { .. } => Ok(()),
    }
}
