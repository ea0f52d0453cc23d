//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use emogo_types::{Mood, RecordKind, Sentiment};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Tables with rounded borders and colors (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser)]
#[command(name = "emogo")]
#[command(author, version, about = "Record and export emogo check-ins", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Database file, or use EMOGO_DB env var
    #[arg(long, global = true, env = "EMOGO_DB")]
    pub db: Option<PathBuf>,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Visual styling mode (rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "EMOGO_STYLE"
    )]
    pub style: StyleMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new check-in entry
    Record {
        #[command(subcommand)]
        entry: RecordEntry,
    },

    /// List stored records of one kind, most recent first
    #[command(alias = "ls")]
    List {
        /// Record kind (questionnaire, location, vlog)
        #[arg(value_parser = parse_kind)]
        kind: RecordKind,

        #[command(flatten)]
        output: OutputArgs,

        /// Show at most this many records (0 for all)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,
    },

    /// Show how many records of each kind are stored
    Summary {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Export every non-empty kind to CSV files
    Export {
        /// Target directory, or use EMOGO_EXPORT_DIR env var
        #[arg(short, long, env = "EMOGO_EXPORT_DIR")]
        dir: Option<PathBuf>,

        /// Skip the configured share command
        #[arg(long)]
        no_share: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Import records from a previously exported CSV file
    Import {
        /// Record kind contained in the file
        #[arg(value_parser = parse_kind)]
        kind: RecordKind,

        /// CSV file to read
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete every stored record
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the daily check-in reminders
    Reminders {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Entries that can be recorded
#[derive(Debug, Clone, Subcommand)]
pub enum RecordEntry {
    /// Record a sentiment questionnaire
    #[command(alias = "q")]
    Questionnaire {
        /// Overall sentiment
        #[arg(short, long, value_parser = parse_sentiment)]
        sentiment: Sentiment,

        /// Current mood
        #[arg(short, long, value_parser = parse_mood)]
        mood: Mood,

        /// Energy level from 1 to 10 (defaults to 5)
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..=10))]
        energy: Option<i64>,
    },

    /// Record a GPS fix
    Location {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Horizontal accuracy in meters
        #[arg(long)]
        accuracy: Option<f64>,
    },

    /// Save a recorded clip and its metadata
    Vlog {
        /// Clip file to save
        clip: PathBuf,

        /// Directory that receives the clip copy (defaults to the media directory)
        #[arg(long)]
        media_dir: Option<PathBuf>,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_kind(s: &str) -> Result<RecordKind, String> {
    s.parse().map_err(|e: emogo_types::ValidationError| e.to_string())
}

fn parse_sentiment(s: &str) -> Result<Sentiment, String> {
    s.parse().map_err(|e: emogo_types::ValidationError| {
        let valid: Vec<_> = Sentiment::ALL.iter().map(|v| v.label()).collect();
        format!("{}. Valid values: {}", e, valid.join(", "))
    })
}

fn parse_mood(s: &str) -> Result<Mood, String> {
    s.parse().map_err(|e: emogo_types::ValidationError| {
        let valid: Vec<_> = Mood::ALL.iter().map(|v| v.label()).collect();
        format!("{}. Valid values: {}", e, valid.join(", "))
    })
}
