use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::debug;

use crate::models::{Channel, SendRequest};

/// Durable local archive of every notification attempt, independent of
/// live-delivery outcome. One text file per message under
/// `outbox/emails/` or `outbox/sms/`, keyed by timestamp + destination.
pub struct OutboxArchive {
    root: PathBuf,
}

impl OutboxArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn archive(&self, request: &SendRequest) -> Result<PathBuf> {
        let subdir = match request.channel {
            Channel::Email => "emails",
            Channel::Sms => "sms",
        };
        let dir = self.root.join(subdir);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;

        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let safe_dest = Self::safe_destination(request);
        let path = dir.join(format!("{}_{}.txt", ts, safe_dest));

        let content = Self::render(request);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        debug!("[{} queued] {}", request.channel, path.display());
        Ok(path)
    }

    fn safe_destination(request: &SendRequest) -> String {
        if request.destination.is_empty() {
            return match request.channel {
                Channel::Email => "no_email".to_string(),
                Channel::Sms => "no_phone".to_string(),
            };
        }
        request.destination.replace('@', "_at_").replace(['/', '\\'], "_")
    }

    fn render(request: &SendRequest) -> String {
        match request.channel {
            Channel::Email => {
                let attachment_note = request
                    .attachment
                    .as_deref()
                    .and_then(|p| p.file_name())
                    .map(|name| format!("\n\n[ATTACHMENT: {}]", name.to_string_lossy()))
                    .unwrap_or_default();
                format!(
                    "TO: {}\nSUBJECT: {}\n\n{}{}",
                    request.destination,
                    request.subject.as_deref().unwrap_or(""),
                    request.body,
                    attachment_note,
                )
            }
            Channel::Sms => request.body.clone(),
        }
    }
}
