//! Outbound transactional email.

pub mod resend;
pub mod templates;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub use resend::ResendEmailSender;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email delivery is disabled")]
    Disabled,

    #[error("email transport failed: {0}")]
    Transport(String),

    #[error("email provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Returns the provider's message id when it supplies one.
    async fn send(&self, message: EmailMessage) -> Result<Option<String>, EmailError>;
}

/// Stand-in used when no provider key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<Option<String>, EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "email delivery disabled; dropping message"
        );
        Err(EmailError::Disabled)
    }
}
