//! Outbox notifier: appends each message as one JSON line to a file for a mail relay to pick up.

use super::{EmailMessage, Notifier, NotifyError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let line = serde_json::to_string(message).map_err(|e| NotifyError::Delivery(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| NotifyError::Delivery(format!("{}: {}", parent.display(), e)))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| NotifyError::Delivery(format!("{}: {}", self.path.display(), e)))?;
        writeln!(file, "{}", line)
            .map_err(|e| NotifyError::Delivery(format!("{}: {}", self.path.display(), e)))?;
        log::info!("Queued \"{}\" in {}", message.subject, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(subject: &str) -> EmailMessage {
        EmailMessage {
            from: "league@example.com".to_string(),
            to: "league@example.com".to_string(),
            bcc: vec!["a@example.com".to_string()],
            subject: subject.to_string(),
            body: "hello".to_string(),
        }
    }

    #[test]
    fn appends_one_json_line_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mail").join("outbox.jsonl");
        let outbox = OutboxNotifier::new(&path);
        outbox.send(&message("first")).unwrap();
        outbox.send(&message("second")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let sent: Vec<EmailMessage> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(sent, vec![message("first"), message("second")]);
    }
}
