use super::{MailAttachment, MailMessage, MailboxSource};
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Spool-directory mail source: an external fetcher (getmail, fetchmail, a
/// mail gateway) drops extracted attachments into the spool directory, and
/// each file is presented as one unread message. Consumed files move to
/// `processed/` so they are never picked up twice — the spool analogue of
/// marking a message read.
pub struct SpoolSource {
    spool_dir: PathBuf,
}

impl SpoolSource {
    pub fn new(spool_dir: PathBuf) -> Self {
        Self { spool_dir }
    }
}

#[async_trait]
impl MailboxSource for SpoolSource {
    async fn fetch_unread(&self) -> Result<Vec<MailMessage>> {
        let spool_dir = self.spool_dir.clone();

        // Plain blocking fs work, small files expected
        tokio::task::spawn_blocking(move || fetch_from_spool(&spool_dir)).await?
    }
}

fn fetch_from_spool(spool_dir: &std::path::Path) -> Result<Vec<MailMessage>> {
    std::fs::create_dir_all(spool_dir)?;
    let processed_dir = spool_dir.join("processed");
    std::fs::create_dir_all(&processed_dir)?;

    let mut messages = Vec::new();

    for entry in std::fs::read_dir(spool_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().to_string();
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read spool file {}: {}", path.display(), e);
                continue;
            }
        };

        // Move out of the spool before reporting it as unread; if the move
        // fails the file stays and will be retried on the next poll
        let target = processed_dir.join(&filename);
        if let Err(e) = std::fs::rename(&path, &target) {
            tracing::warn!("Failed to move spool file {}: {}", path.display(), e);
            continue;
        }

        messages.push(MailMessage {
            uid: filename.clone(),
            subject: filename.clone(),
            attachments: vec![MailAttachment { filename, data }],
        });
    }

    Ok(messages)
}
