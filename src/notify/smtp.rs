use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info};

use super::error::NotifyError;
use super::message::Notification;
use super::Notifier;
use crate::config::SmtpConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers notifications through an SMTP server.
pub struct SmtpNotifier {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.from)?;

        let transport = if config.tls {
            let mut builder = SmtpTransport::relay(&config.host)?
                .port(config.port)
                .timeout(Some(SMTP_TIMEOUT));
            if !config.username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ));
            }
            builder.build()
        } else {
            SmtpTransport::builder_dangerous(&config.host)
                .port(config.port)
                .timeout(Some(SMTP_TIMEOUT))
                .build()
        };

        Ok(Self { from, transport })
    }

    /// Send one notification, reporting any failure to the caller.
    pub fn try_send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&notification.recipient)?)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())?;

        self.transport.send(&email)?;
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, notification: &Notification) {
        match self.try_send(notification) {
            Ok(()) => info!(to = %notification.recipient, subject = %notification.subject, "email sent"),
            Err(e) => error!(
                to = %notification.recipient,
                error = %e,
                "failed to send email"
            ),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
