use crate::domain::{FeedbackDraft, FeedbackEntry};
use crate::error::Error;
use crate::mailer::{EmailMessage, Notifier};
use crate::persistence::{DocStore, SURVEY_FILE};
use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::warn;

/// What happened to the outbound notification for a submission.
/// The entry itself is persisted regardless.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    Sent,
    /// No mail configuration; feedback saved locally only
    Skipped,
    Failed(String),
}

/// Accepts free-text submissions, persists them, and forwards them to the
/// administrator when mail is configured.
pub struct FeedbackIntake {
    store: DocStore,
    notifier: Option<Box<dyn Notifier>>,
    from: String,
    admin_to: String,
}

impl FeedbackIntake {
    pub fn new(
        store: DocStore,
        notifier: Option<Box<dyn Notifier>>,
        from: String,
        admin_to: String,
    ) -> Self {
        Self {
            store,
            notifier,
            from,
            admin_to,
        }
    }

    pub fn entries(&self) -> Result<Vec<FeedbackEntry>> {
        self.store.load(SURVEY_FILE, Vec::new())
    }

    /// Validate, persist and best-effort forward one submission.
    ///
    /// Empty feedback text is rejected before anything is written. A blank
    /// name defaults to "anonymous". Notification failure is reported in the
    /// outcome but never rolls back the saved entry.
    pub fn submit(
        &self,
        draft: FeedbackDraft,
        now: NaiveDateTime,
    ) -> Result<(FeedbackEntry, NotifyOutcome)> {
        let feedback = draft.feedback.trim().to_string();
        if feedback.is_empty() {
            return Err(Error::EmptyFeedback.into());
        }

        let name = {
            let trimmed = draft.name.trim();
            if trimmed.is_empty() {
                "anonymous".to_string()
            } else {
                trimmed.to_string()
            }
        };

        let mut entries = self.entries()?;
        let entry = FeedbackEntry {
            id: entries.len() as u64 + 1,
            timestamp: now,
            name,
            email: draft.email.trim().to_string(),
            kind: draft.kind,
            feedback,
            urgency: draft.urgency,
            language: draft.language,
        };
        entries.push(entry.clone());
        self.store.save(SURVEY_FILE, &entries)?;

        let outcome = self.notify(&entry);
        Ok((entry, outcome))
    }

    fn notify(&self, entry: &FeedbackEntry) -> NotifyOutcome {
        let Some(notifier) = &self.notifier else {
            return NotifyOutcome::Skipped;
        };

        let admin_mail = EmailMessage {
            from: self.from.clone(),
            to: self.admin_to.clone(),
            subject: format!("CampusEingang - new feedback from {}", entry.name),
            body: admin_body(entry),
            plain_text: false,
        };
        if let Err(err) = notifier.send(&admin_mail) {
            warn!(%err, "feedback notification failed; entry kept locally");
            return NotifyOutcome::Failed(err.to_string());
        }

        // Confirmation to the submitter, only when they left an address
        if !entry.email.is_empty() {
            let confirmation = EmailMessage {
                from: self.from.clone(),
                to: entry.email.clone(),
                subject: "Your feedback was received".to_string(),
                body: format!(
                    "Hello {},\n\nthank you for your feedback! We will look into it \
                     as soon as possible.\n\nYour feedback: {}\n\nThe CampusEingang team",
                    entry.name, entry.feedback
                ),
                plain_text: true,
            };
            if let Err(err) = notifier.send(&confirmation) {
                warn!(%err, "confirmation mail failed");
            }
        }

        NotifyOutcome::Sent
    }
}

/// HTML body of the admin notification.
fn admin_body(entry: &FeedbackEntry) -> String {
    let contact = if entry.email.is_empty() {
        "not provided"
    } else {
        entry.email.as_str()
    };
    format!(
        "<html><body>\
         <h1>New feedback - CampusEingang</h1>\
         <p><b>From:</b> {}</p>\
         <p><b>Contact:</b> {}</p>\
         <p><b>Kind:</b> {}</p>\
         <p><b>Urgency:</b> {}</p>\
         <p><b>Feedback:</b></p><p style=\"white-space: pre-line;\">{}</p>\
         <p><b>Language:</b> {}</p>\
         </body></html>",
        entry.name,
        contact,
        entry.kind,
        entry.urgency,
        entry.feedback,
        entry.language.name()
    )
}
