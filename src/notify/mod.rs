//! Notification gateway: templated email to the league's fixed recipient list.
//!
//! Delivery is best-effort. A failed send is reported next to the already-saved
//! record and never undoes it.

mod outbox;
mod smtp;

pub use outbox::OutboxNotifier;
pub use smtp::{build_message, SmtpNotifier, SmtpSettings};

use crate::models::Invitation;
use serde::{Deserialize, Serialize};

/// Sender, recipients and link shared by every message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MailSettings {
    pub sender: String,
    /// Blind-copied on every message.
    pub recipients: Vec<String>,
    /// Link to the app, included in invitation emails when set.
    pub app_url: Option<String>,
}

/// A rendered email, ready for a transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    /// The sender addresses the message to itself; the league is in Bcc.
    pub to: String,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    fn new(settings: &MailSettings, subject: &str, body: String) -> Self {
        Self {
            from: settings.sender.clone(),
            to: settings.sender.clone(),
            bcc: settings.recipients.clone(),
            subject: subject.to_string(),
            body,
        }
    }

    /// "A player is looking for a match" announcement.
    pub fn invitation_opened(settings: &MailSettings, invitation: &Invitation) -> Self {
        let mut body = format!(
            "OPEN MATCH INVITATION\n\n\
             {} is looking for a match.\n\n\
             Date: {}\n\
             Time: {}\n\
             Location: {}\n\n\
             Open the ranking app to accept this invitation.\n",
            invitation.created_by, invitation.match_date, invitation.match_time, invitation.location,
        );
        if let Some(url) = settings.app_url.as_deref().filter(|u| !u.is_empty()) {
            body.push_str(&format!("\n{}\n", url));
        }
        body.push_str("\nFirst come, first served.\n");
        Self::new(settings, "🎾 Open Tennis Match Invitation", body)
    }

    /// Confirmation that an invitation was accepted and is now closed.
    pub fn invitation_claimed(settings: &MailSettings, invitation: &Invitation) -> Self {
        let claimer = invitation.claimed_by.as_deref().unwrap_or("another player");
        let body = format!(
            "MATCH CONFIRMED\n\n\
             The open invitation has been accepted.\n\n\
             {} will play against {}\n\n\
             Date: {}\n\
             Time: {}\n\
             Location: {}\n\n\
             The invitation is now closed.\n",
            invitation.created_by,
            claimer,
            invitation.match_date,
            invitation.match_time,
            invitation.location,
        );
        Self::new(settings, "🎾 Match Confirmed – Invitation Closed", body)
    }
}

/// The transport failed to hand the message off.
#[derive(Debug)]
pub enum NotifyError {
    Delivery(String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Delivery(reason) => write!(f, "Notification not delivered: {}", reason),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Outcome of the notification that follows a saved action.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Delivery {
    Sent,
    /// Nobody to notify.
    Skipped,
    Failed(String),
}

/// Synchronous email transport: blocks until the message is handed off or fails.
pub trait Notifier: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Writes each message to the log instead of sending it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        log::info!(
            "Email \"{}\" to {} recipient(s):\n{}",
            message.subject,
            message.bcc.len(),
            message.body
        );
        Ok(())
    }
}
