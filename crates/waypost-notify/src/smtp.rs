//! SMTP notification relay.
//!
//! Sends each notification as a plain-text mail from the configured SMTP
//! login to every configured recipient, with the level as the subject.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use waypost_core::config::SmtpConfig;

use crate::error::RelayError;
use crate::{Notification, NotificationRelay};

/// Relay that delivers notifications through an SMTP server.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipients: Vec<String>,
}

impl SmtpRelay {
    /// Build a relay from the `[smtp]` config section.
    ///
    /// No connection is made here; STARTTLS is used when the server offers it.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, RelayError> {
        let tls = TlsParameters::new(config.server.clone())
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
            .port(config.port)
            .tls(Tls::Opportunistic(tls))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        tracing::info!(
            server = %config.server,
            port = config.port,
            recipients = config.recipients().len(),
            "SMTP relay configured"
        );

        Ok(Self {
            transport,
            sender: config.username.clone(),
            recipients: config.recipients(),
        })
    }

    /// Compose the outgoing message for `notification`.
    pub fn build_message(&self, notification: &Notification) -> Result<Message, RelayError> {
        compose(&self.sender, &self.recipients, notification)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, RelayError> {
    address.parse::<Mailbox>().map_err(|e| RelayError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

fn compose(
    sender: &str,
    recipients: &[String],
    notification: &Notification,
) -> Result<Message, RelayError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .subject(notification.level.clone())
        .header(ContentType::TEXT_PLAIN);

    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(notification.body.clone())
        .map_err(|e| RelayError::Message(e.to_string()))
}

#[async_trait]
impl NotificationRelay for SmtpRelay {
    async fn relay(&self, notification: &Notification) -> Result<(), RelayError> {
        let message = self.build_message(notification)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        tracing::info!(
            level = %notification.level,
            recipients = self.recipients.len(),
            "Notification relayed"
        );
        Ok(())
    }
}
