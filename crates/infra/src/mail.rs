//! Mail transports.
//!
//! SMTP is outside this workspace; `TracingMailer` stands in for it in dev by
//! logging each delivery (never the body, which carries a credential).

use std::sync::Mutex;

use tracing::info;

use partstrack_auth::{DeliveryError, MailDelivery};

#[derive(Debug, Clone, Default)]
pub struct TracingMailer {
    sender: String,
}

impl TracingMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self { sender: sender.into() }
    }
}

impl MailDelivery for TracingMailer {
    fn send(&self, subject: &str, _body: &str, recipient: &str) -> Result<(), DeliveryError> {
        info!(from = %self.sender, to = %recipient, subject = %subject, "mail delivered");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl MailDelivery for RecordingMailer {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), DeliveryError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError("mailbox lock poisoned".to_string()))?;
        sent.push(SentMail {
            subject: subject.to_string(),
            body: body.to_string(),
            recipient: recipient.to_string(),
        });
        Ok(())
    }
}

/// Rejects every message.
#[derive(Debug, Clone)]
pub struct FailingMailer {
    reason: String,
}

impl FailingMailer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl MailDelivery for FailingMailer {
    fn send(&self, _subject: &str, _body: &str, _recipient: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError(self.reason.clone()))
    }
}
