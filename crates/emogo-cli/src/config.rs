//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use emogo_types::{CheckIn, default_schedule};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file (defaults to the platform data directory)
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Directory for CSV exports (defaults to ~/Documents/emogo)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Directory for recorded clips
    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    /// Command run once per exported file, with the file path appended
    /// as the last argument (e.g. `["open"]` or `["xdg-open"]`)
    #[serde(default)]
    pub share_command: Vec<String>,

    /// How long to wait for the database to open, in seconds
    #[serde(default)]
    pub open_timeout_secs: Option<u64>,

    /// Daily check-in reminders
    #[serde(default = "default_schedule")]
    pub reminders: Vec<CheckIn>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            export_dir: None,
            media_dir: None,
            share_command: Vec::new(),
            open_timeout_secs: None,
            reminders: default_schedule(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("emogo")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the given file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Database path: explicit flag or env var, then config, then platform default.
    pub fn resolve_db_path(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.or_else(|| self.database.clone())
            .unwrap_or_else(emogo_store::default_db_path)
    }

    /// Export directory: explicit flag or env var, then config, then platform default.
    pub fn resolve_export_dir(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.or_else(|| self.export_dir.clone())
            .unwrap_or_else(emogo_store::default_export_dir)
    }

    pub fn resolve_media_dir(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.or_else(|| self.media_dir.clone())
            .unwrap_or_else(emogo_store::default_media_dir)
    }

    /// Open timeout; `0` disables it.
    pub fn open_timeout(&self) -> Option<Duration> {
        match self.open_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(emogo_store::DEFAULT_OPEN_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_has_three_reminders() {
        let config = Config::default();
        let labels: Vec<_> = config.reminders.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Morning", "Afternoon", "Evening"]);
    }

    #[test]
    fn test_resolve_db_path_prefers_arg() {
        let config = Config {
            database: Some(PathBuf::from("/config/emogo.db")),
            ..Default::default()
        };
        let result = config.resolve_db_path(Some(PathBuf::from("/arg/emogo.db")));
        assert_eq!(result, PathBuf::from("/arg/emogo.db"));
    }

    #[test]
    fn test_resolve_db_path_falls_back_to_config() {
        let config = Config {
            database: Some(PathBuf::from("/config/emogo.db")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(None), PathBuf::from("/config/emogo.db"));
    }

    #[test]
    fn test_resolve_db_path_default() {
        let config = Config::default();
        assert_eq!(config.resolve_db_path(None), emogo_store::default_db_path());
    }

    #[test]
    fn test_open_timeout() {
        let mut config = Config::default();
        assert_eq!(config.open_timeout(), Some(emogo_store::DEFAULT_OPEN_TIMEOUT));

        config.open_timeout_secs = Some(0);
        assert_eq!(config.open_timeout(), None);

        config.open_timeout_secs = Some(12);
        assert_eq!(config.open_timeout(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("export_dir = \"/tmp/out\"\n").unwrap();
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.reminders, default_schedule());
        assert!(config.share_command.is_empty());
    }

    #[test]
    fn test_reminders_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [[reminders]]
            at = "07:30"
            label = "Early"
            "#,
        )
        .unwrap();
        assert_eq!(config.reminders.len(), 1);
        assert_eq!(config.reminders[0].to_string(), "07:30 Early");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            share_command: vec!["xdg-open".to_string()],
            open_timeout_secs: Some(3),
            ..Default::default()
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_unparseable_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "reminders = 3").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }
}
