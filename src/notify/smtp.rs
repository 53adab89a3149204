//! SMTP notifier: STARTTLS relay with login, the league in Bcc.

use super::{EmailMessage, Notifier, NotifyError};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Relay address and login.
#[derive(Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SmtpSettings {
    /// Submission port with STARTTLS.
    pub const DEFAULT_PORT: u16 = 587;
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct SmtpNotifier {
    transport: SmtpTransport,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let transport = SmtpTransport::starttls_relay(&settings.host)
            .map_err(|e| NotifyError::Delivery(format!("{}: {}", settings.host, e)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e| NotifyError::Delivery(format!("bad address {:?}: {}", address, e)))
}

/// Plain-text message from the sender to itself, the recipients in Bcc.
pub fn build_message(message: &EmailMessage) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(mailbox(&message.from)?)
        .to(mailbox(&message.to)?)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    for address in &message.bcc {
        builder = builder.bcc(mailbox(address)?);
    }
    builder
        .body(message.body.clone())
        .map_err(|e| NotifyError::Delivery(e.to_string()))
}

impl Notifier for SmtpNotifier {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let email = build_message(message)?;
        self.transport
            .send(&email)
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        log::info!(
            "Sent \"{}\" to {} recipient(s)",
            message.subject,
            message.bcc.len()
        );
        Ok(())
    }
}
