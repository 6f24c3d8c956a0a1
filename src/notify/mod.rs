pub mod error;
pub mod message;
pub mod smtp;

pub use message::Notification;
pub use smtp::SmtpNotifier;

use tracing::info;

/// Best-effort delivery of a notification.
///
/// Implementations never report failure to the caller; they log it. A ticket
/// operation that succeeded stays successful whatever happens here.
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification);
}

/// Writes notifications to the log instead of mailing them.
/// Used when no SMTP server is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) {
        info!(
            to = %notification.recipient,
            subject = %notification.subject,
            "email not sent (no SMTP configured)\n{}",
            notification.body
        );
    }
}
