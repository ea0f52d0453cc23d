//! Command-line interface for emogo check-ins.
//!
//! The `emogo` binary records sentiment questionnaires, GPS fixes and short
//! vlog clips into a local SQLite database, shows what has been collected,
//! and exports everything to CSV.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `record questionnaire` | Save sentiment, mood and energy |
//! | `record location` | Save a GPS fix |
//! | `record vlog` | Copy a clip into the media directory and save its metadata |
//! | `list` | Show stored records of one kind, most recent first |
//! | `summary` | Count records per kind |
//! | `export` | Write one CSV file per non-empty kind |
//! | `import` | Restore records from an exported CSV file |
//! | `clear` | Delete every stored record |
//! | `reminders` | Show the daily check-in schedule |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI reads `~/.config/emogo/config.toml` (or platform equivalent):
//!
//! - `database`: database file
//! - `export_dir`: directory for CSV exports
//! - `media_dir`: directory for recorded clips
//! - `share_command`: command run once per exported file
//! - `open_timeout_secs`: database open timeout (`0` disables it)
//! - `reminders`: list of `{ at = "HH:MM", label = "..." }`
//!
//! # Environment Variables
//!
//! - `EMOGO_DB`: database file (overridden by `--db`)
//! - `EMOGO_EXPORT_DIR`: export directory (overridden by `export --dir`)
//! - `NO_COLOR`: disable colored output when set
//!
//! # Examples
//!
//! ```bash
//! emogo record questionnaire --sentiment positive --mood happy --energy 7
//! emogo record location --lat 25.0330 --lon 121.5654 --accuracy 8
//! emogo summary
//! emogo export --dir ~/Desktop/emogo
//! ```

// The binary lives in main.rs; this target re-exports the libraries it
// drives for programmatic use.

pub use emogo_store;
pub use emogo_types;
