//! Share exported files through an external command.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use emogo_store::ShareTarget;
use tracing::debug;

/// Runs `program args... <file>` once per exported file.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    /// Build from a configured command line. Returns `None` when it is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl ShareTarget for CommandShare {
    async fn share(&self, path: &Path) -> io::Result<()> {
        debug!("Sharing {} via {}", path.display(), self.program);
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_none() {
        assert!(CommandShare::from_command(&[]).is_none());
        assert!(CommandShare::from_command(&[" ".to_string()]).is_none());
    }

    #[test]
    fn test_command_splits_program_and_args() {
        let share =
            CommandShare::from_command(&["mail".to_string(), "-a".to_string()]).unwrap();
        assert_eq!(share.program, "mail");
        assert_eq!(share.args, ["-a"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_share_runs_command_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("questionnaire.csv");
        std::fs::write(&file, "ID\n").unwrap();

        let share = CommandShare::from_command(&["test".to_string(), "-f".to_string()]).unwrap();
        share.share(&file).await.unwrap();

        let missing = dir.path().join("missing.csv");
        assert!(share.share(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let share =
            CommandShare::from_command(&["emogo-no-such-share-program".to_string()]).unwrap();
        assert!(share.share(Path::new("x.csv")).await.is_err());
    }
}
