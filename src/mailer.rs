use anyhow::{Context, Result};
use serde_json::json;
use std::time::Duration;

/// One outbound message. Bodies are HTML unless `plain_text` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub plain_text: bool,
}

/// External email-sending collaborator. Invoked best-effort: callers must
/// not let a send failure undo local persistence.
pub trait Notifier {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// SendGrid v3 `mail/send` implementation.
pub struct SendGridNotifier {
    api_key: String,
    client: reqwest::blocking::Client,
    endpoint: String,
}

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

impl SendGridNotifier {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_endpoint(api_key, SENDGRID_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_key,
            client,
            endpoint,
        })
    }
}

impl Notifier for SendGridNotifier {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        let content_type = if message.plain_text {
            "text/plain"
        } else {
            "text/html"
        };
        let body = json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": message.from },
            "subject": message.subject,
            "content": [{ "type": content_type, "value": message.body }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("Failed to reach the mail service")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            anyhow::bail!("mail service rejected the message: {} {}", status, detail);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Test double that records everything it is asked to send.
    pub struct RecordingNotifier {
        pub sent: RefCell<Vec<EmailMessage>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail: false,
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, message: &EmailMessage) -> Result<()> {
            if self.fail {
                anyhow::bail!("simulated send failure");
            }
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    #[test]
    fn test_recording_notifier_captures_messages() {
        let notifier = RecordingNotifier::new();
        let msg = EmailMessage {
            from: "campus@eingang.de".to_string(),
            to: "admin@example.com".to_string(),
            subject: "hello".to_string(),
            body: "<p>hi</p>".to_string(),
            plain_text: false,
        };
        notifier.send(&msg).unwrap();
        assert_eq!(notifier.sent.borrow().len(), 1);
        assert_eq!(notifier.sent.borrow()[0], msg);
    }
}
