//! Outbound notification relay.
//!
//! Defines the `NotificationRelay` trait consumed by the `/notify` handler
//! and the SMTP implementation used in production.

pub mod error;
pub mod smtp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::RelayError;
pub use smtp::SmtpRelay;

/// A notification forwarded by `/notify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity label; becomes the mail subject.
    pub level: String,
    /// Message text.
    pub body: String,
}

/// Delivers notifications to an outbound channel.
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    /// Deliver a single notification. Blocks only on the outbound connection.
    async fn relay(&self, notification: &Notification) -> Result<(), RelayError>;
}
