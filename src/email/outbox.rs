//! Mail transport interface and the file-spool implementation.
//!
//! Actual delivery belongs to an external MTA; `OutboxMailer` writes one
//! plain-text message file per send into an outbox directory that the
//! MTA picks up. There is no retry here: a failed write propagates to
//! the orchestrator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// A rendered outbound message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The mail-transport collaborator. One outbound message per call.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Spools messages as files into an outbox directory.
pub struct OutboxMailer {
    dir: PathBuf,
}

impl OutboxMailer {
    /// Create a mailer spooling into `dir`. The directory is created on
    /// the first send.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn render(message: &EmailMessage) -> String {
        format!(
            "To: {}\nSubject: {}\n\n{}\n",
            message.to, message.subject, message.body
        )
    }
}

#[async_trait]
impl MailTransport for OutboxMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create outbox directory: {}", self.dir.display()))?;

        let file_name = format!("{}.eml", Uuid::new_v4());
        let path = self.dir.join(&file_name);

        std::fs::write(&path, Self::render(message))
            .with_context(|| format!("Failed to spool message to {}", path.display()))?;

        info!("Spooled message for {} to {}", message.to, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spooled_message_contains_headers_and_body() {
        let dir = std::env::temp_dir().join(format!("insight-outbox-{}", Uuid::new_v4()));
        let mailer = OutboxMailer::new(dir.clone());

        let message = EmailMessage {
            to: "ceo@example.com".to_string(),
            subject: "Weekly Sales Report - 2025-11-01 to 2025-11-07".to_string(),
            body: "Body text".to_string(),
        };

        mailer.send(&message).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let content = std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
        assert!(content.starts_with("To: ceo@example.com\n"));
        assert!(content.contains("Subject: Weekly Sales Report"));
        assert!(content.contains("Body text"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_each_send_spools_a_new_file() {
        let dir = std::env::temp_dir().join(format!("insight-outbox-{}", Uuid::new_v4()));
        let mailer = OutboxMailer::new(dir.clone());

        let message = EmailMessage {
            to: "ceo@example.com".to_string(),
            subject: "Report".to_string(),
            body: "Body".to_string(),
        };

        mailer.send(&message).await.unwrap();
        mailer.send(&message).await.unwrap();

        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
