pub mod enums;
pub mod feedback;
pub mod task;

pub use enums::{Category, DueStatus, FeedbackKind, Language, Priority, Urgency};
pub use feedback::{FeedbackDraft, FeedbackEntry};
pub use task::{Task, TaskDraft, TaskEdits};

/// Serde format for timestamps: `YYYY-MM-DD HH:MM:SS`, the layout the
/// data files use for `deleted_at`, feedback timestamps and timer entries.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
