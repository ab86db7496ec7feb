//! The delivery seam used by the signup flow.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::email::EmailError;

/// Delivers a plaintext confirmation code to a user.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    async fn send_code(&self, to_email: &str, username: &str, code: &str) -> Result<(), EmailError>;
}

/// Writes codes to the log instead of sending mail. Used when `SMTP_HOST` is
/// not configured (local development).
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl ConfirmationMailer for LogMailer {
    async fn send_code(&self, to_email: &str, username: &str, code: &str) -> Result<(), EmailError> {
        tracing::warn!(
            to = to_email,
            username,
            code,
            "SMTP not configured; confirmation code logged instead of mailed"
        );
        Ok(())
    }
}

/// A delivered code, as captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub to_email: String,
    pub username: String,
    pub code: String,
}

/// Keeps every delivered code in memory.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentCode>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All deliveries so far, oldest first.
    pub async fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().await.clone()
    }

    /// The most recent code delivered to `username`.
    pub async fn last_code_for(&self, username: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|s| s.username == username)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl ConfirmationMailer for RecordingMailer {
    async fn send_code(&self, to_email: &str, username: &str, code: &str) -> Result<(), EmailError> {
        self.sent.lock().await.push(SentCode {
            to_email: to_email.to_string(),
            username: username.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}
