use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub channel: Channel,
    pub destination: String,
    pub subject: Option<String>,
    pub body: String,
    pub attachment: Option<PathBuf>,
}

impl SendRequest {
    pub fn email(destination: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            channel: Channel::Email,
            destination: destination.into(),
            subject: Some(subject.into()),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn sms(destination: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            channel: Channel::Sms,
            destination: destination.into(),
            subject: None,
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Option<PathBuf>) -> Self {
        self.attachment = attachment;
        self
    }
}

/// Outcome of one send attempt. The archive write is the durability
/// guarantee; `delivered` only reports whether the live gateway accepted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub delivered: bool,
    pub archived_to: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Gateway not configured for {0}")]
    NotConfigured(Channel),

    #[error("Gateway error: {0}")]
    GatewayError(String),

    #[error("Outbox write failed: {0}")]
    OutboxError(String),
}
