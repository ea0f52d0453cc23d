//! Record command - capture one questionnaire, location or vlog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use emogo_store::file_stamp;
use emogo_types::{Energy, NewLocation, NewQuestionnaire, NewVlog};
use time::OffsetDateTime;
use tracing::info;

use super::Session;
use crate::cli::RecordEntry;

/// Execute the record command.
///
/// The draft is validated before the database is opened, so a rejected
/// entry never creates or touches storage.
pub async fn cmd_record(entry: RecordEntry, session: &Session) -> Result<()> {
    match entry {
        RecordEntry::Questionnaire {
            sentiment,
            mood,
            energy,
        } => {
            let energy = energy
                .map(Energy::try_from)
                .transpose()?
                .unwrap_or_default();
            let draft = NewQuestionnaire::new(sentiment, mood, energy);
            let id = session
                .store()
                .await?
                .insert_questionnaire(draft)
                .await
                .context("Failed to save questionnaire")?;
            session.note(format!("Questionnaire saved (id {})", id));
            println!("{}", id);
        }
        RecordEntry::Location { lat, lon, accuracy } => {
            let draft = NewLocation::new(lat, lon, accuracy)?;
            let id = session
                .store()
                .await?
                .insert_location(draft)
                .await
                .context("Failed to save location")?;
            session.note(format!("Location saved (id {})", id));
            println!("{}", id);
        }
        RecordEntry::Vlog { clip, media_dir } => {
            let media_dir = session.config.resolve_media_dir(media_dir);
            let saved = save_clip(&clip, &media_dir, OffsetDateTime::now_utc()).await?;
            let filename = saved
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let draft = NewVlog::clip(filename, file_uri(&saved))?;
            let id = session
                .store()
                .await?
                .insert_vlog(draft)
                .await
                .context("Failed to save vlog")?;
            session.note(format!("Vlog saved to {} (id {})", saved.display(), id));
            println!("{}", id);
        }
    }

    Ok(())
}

/// Copy `clip` into `media_dir` as `vlog_<stamp>.mp4`.
async fn save_clip(clip: &Path, media_dir: &Path, at: OffsetDateTime) -> Result<PathBuf> {
    if !tokio::fs::try_exists(clip).await.unwrap_or(false) {
        bail!("Clip not found: {}", clip.display());
    }

    tokio::fs::create_dir_all(media_dir)
        .await
        .with_context(|| format!("Failed to create media directory {}", media_dir.display()))?;

    let target = media_dir.join(format!("vlog_{}.mp4", file_stamp(at)?));
    tokio::fs::copy(clip, &target)
        .await
        .with_context(|| format!("Failed to copy clip to {}", target.display()))?;

    info!("Copied {} to {}", clip.display(), target.display());
    Ok(target)
}

fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}
