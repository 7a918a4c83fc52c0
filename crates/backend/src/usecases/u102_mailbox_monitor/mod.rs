//! Mailbox monitor: polls a mail source for unread messages, saves CSV
//! attachments to shared storage and forwards them to the enrichment
//! endpoint. Lives entirely outside the enrichment core and consumes only
//! the HTTP contract.

pub mod spool_source;

use crate::shared::config::MailboxConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// One attachment pulled from a message.
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// One unread message with its attachments already extracted.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub uid: String,
    pub subject: String,
    pub attachments: Vec<MailAttachment>,
}

/// Source of unread mail. The concrete transport (IMAP or anything else)
/// plugs in behind this trait; fetching is expected to mark messages read.
#[async_trait]
pub trait MailboxSource: Send + Sync {
    async fn fetch_unread(&self) -> Result<Vec<MailMessage>>;
}

/// Polling loop driver around a `MailboxSource`.
pub struct MailboxMonitor {
    source: Arc<dyn MailboxSource>,
    http: reqwest::Client,
    config: MailboxConfig,
    storage_path: PathBuf,
}

impl MailboxMonitor {
    pub fn new(source: Arc<dyn MailboxSource>, config: MailboxConfig, storage_path: PathBuf) -> Self {
        Self {
            source,
            http: reqwest::Client::new(),
            config,
            storage_path,
        }
    }

    /// Run forever: poll, forward, sleep. A failed poll backs off and the
    /// loop continues; nothing in here can take the process down.
    pub async fn run(self) {
        tracing::info!(
            "Starting mailbox monitor (interval {}s)",
            self.config.check_interval_secs
        );

        loop {
            match self.check_once().await {
                Ok(forwarded) => {
                    if forwarded > 0 {
                        tracing::info!("Forwarded {} CSV attachment(s)", forwarded);
                    }
                    tokio::time::sleep(Duration::from_secs(self.config.check_interval_secs)).await;
                }
                Err(e) => {
                    tracing::error!("Mailbox check failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(self.config.error_backoff_secs)).await;
                }
            }
        }
    }

    /// One poll cycle. Returns how many attachments were forwarded.
    /// Per-message failures are logged and skipped.
    pub async fn check_once(&self) -> Result<usize> {
        let messages = self.source.fetch_unread().await?;
        if !messages.is_empty() {
            tracing::info!("Found {} unread message(s)", messages.len());
        }

        let max_bytes = self.config.max_file_size_mb * 1024 * 1024;
        let mut forwarded = 0usize;

        for message in messages {
            tracing::info!("Processing message '{}' ({})", message.subject, message.uid);

            for attachment in select_csv_attachments(&message.attachments, max_bytes) {
                let saved = match save_attachment(&self.storage_path, attachment) {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::error!("Failed to save attachment {}: {}", attachment.filename, e);
                        continue;
                    }
                };

                match self.forward_file(&saved).await {
                    Ok(()) => forwarded += 1,
                    Err(e) => {
                        tracing::error!("Failed to forward {}: {}", saved.display(), e);
                    }
                }
            }
        }

        Ok(forwarded)
    }

    /// POST one saved file to the enrichment endpoint and persist the
    /// enriched response next to it.
    async fn forward_file(&self, path: &Path) -> Result<()> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment.csv".to_string());
        let data = tokio::fs::read(path).await?;

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.clone())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::info!("Sending {} to {}", filename, self.config.api_url);
        let response = self
            .http
            .post(&self.config.api_url)
            .multipart(form)
            .timeout(Duration::from_secs(300))
            .send()
            .await?
            .error_for_status()?;

        let enriched = response.bytes().await?;
        let output_path = self.storage_path.join(format!("enriched_{}", filename));
        tokio::fs::write(&output_path, &enriched).await?;
        tracing::info!("Saved enriched result: {}", output_path.display());

        Ok(())
    }
}

/// CSV attachments within the size cap; everything else is skipped with a log
/// line naming the reason.
fn select_csv_attachments(attachments: &[MailAttachment], max_bytes: u64) -> Vec<&MailAttachment> {
    attachments
        .iter()
        .filter(|a| {
            if !a.filename.to_lowercase().ends_with(".csv") {
                tracing::debug!("Skipping non-CSV attachment: {}", a.filename);
                return false;
            }
            if a.data.is_empty() {
                tracing::warn!("Skipping empty attachment: {}", a.filename);
                return false;
            }
            if a.data.len() as u64 > max_bytes {
                tracing::warn!(
                    "Skipping oversized attachment {} ({} bytes)",
                    a.filename,
                    a.data.len()
                );
                return false;
            }
            true
        })
        .collect()
}

/// Save under a timestamped name so repeated sends of the same filename
/// never clobber each other.
fn save_attachment(storage_path: &Path, attachment: &MailAttachment) -> Result<PathBuf> {
    std::fs::create_dir_all(storage_path)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    // Keep only the final path component of whatever the sender named the file
    let safe_name = Path::new(&attachment.filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "attachment.csv".to_string());

    let path = storage_path.join(format!("{}_{}", timestamp, safe_name));
    std::fs::write(&path, &attachment.data)?;
    tracing::info!("Saved CSV attachment: {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(filename: &str, bytes: usize) -> MailAttachment {
        MailAttachment {
            filename: filename.to_string(),
            data: vec![b'x'; bytes],
        }
    }

    #[test]
    fn test_select_csv_attachments_filters() {
        let attachments = vec![
            attachment("pecas.csv", 10),
            attachment("PECAS.CSV", 10),
            attachment("foto.jpg", 10),
            attachment("empty.csv", 0),
            attachment("huge.csv", 2 * 1024 * 1024),
        ];
        let selected = select_csv_attachments(&attachments, 1024 * 1024);
        let names: Vec<&str> = selected.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["pecas.csv", "PECAS.CSV"]);
    }

    #[test]
    fn test_save_attachment_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let tricky = MailAttachment {
            filename: "../../etc/pecas.csv".to_string(),
            data: b"referencia;descricao\n".to_vec(),
        };
        let path = save_attachment(dir.path(), &tricky).unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_pecas.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), tricky.data);
    }

    struct StubSource {
        messages: Vec<MailMessage>,
    }

    #[async_trait]
    impl MailboxSource for StubSource {
        async fn fetch_unread(&self) -> Result<Vec<MailMessage>> {
            Ok(self.messages.clone())
        }
    }

    #[tokio::test]
    async fn test_check_once_skips_unforwardable_but_saves() {
        let dir = tempfile::tempdir().unwrap();
        let config = MailboxConfig {
            enabled: true,
            check_interval_secs: 1,
            error_backoff_secs: 1,
            max_file_size_mb: 1,
            // Nothing listens here; forwarding fails, saving must still happen
            api_url: "http://127.0.0.1:1/api/enrich-csv".to_string(),
            spool_dir: String::new(),
        };
        let source = Arc::new(StubSource {
            messages: vec![MailMessage {
                uid: "1".to_string(),
                subject: "Planilha".to_string(),
                attachments: vec![attachment("pecas.csv", 16), attachment("foto.jpg", 16)],
            }],
        });

        let monitor = MailboxMonitor::new(source, config, dir.path().to_path_buf());
        let forwarded = monitor.check_once().await.unwrap();
        assert_eq!(forwarded, 0);

        let saved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].ends_with("_pecas.csv"));
    }
}
