use super::enums::{FeedbackKind, Language, Urgency};
use super::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A persisted free-text feedback submission.
///
/// Entries are append-only; the core never mutates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: u64,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub feedback: String,
    pub urgency: Urgency,
    pub language: Language,
}

/// Fields supplied by the submitter
#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub name: String,
    pub email: String,
    pub kind: FeedbackKind,
    pub feedback: String,
    pub urgency: Urgency,
    pub language: Language,
}

impl Default for FeedbackDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            kind: FeedbackKind::Suggestion,
            feedback: String::new(),
            urgency: Urgency::Medium,
            language: Language::default(),
        }
    }
}
