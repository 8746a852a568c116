use super::enums::{Category, DueStatus, Priority};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An onboarding to-do item with deadline, category, priority and
/// accumulated tracked time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id assigned from the stored `next_id` counter
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    /// `None` means "no deadline"
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub done: bool,
    /// Estimated effort in minutes, at least 1
    pub estimated_time: u32,
    /// Minutes accumulated by the timer, never edited directly
    #[serde(default)]
    pub total_time_spent: f64,
}

impl Task {
    /// Classify the deadline relative to `today`.
    ///
    /// A task counts as overdue only while it is not done; a task without a
    /// deadline is always upcoming with no day count.
    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        match self.deadline {
            Some(deadline) if !self.done && deadline < today => DueStatus::Overdue,
            Some(deadline) if deadline <= today => DueStatus::DueToday,
            Some(deadline) => DueStatus::Upcoming {
                days_left: Some((deadline - today).num_days()),
            },
            None => DueStatus::Upcoming { days_left: None },
        }
    }

    /// Ratio of tracked time to the estimate, clamped to `0.0..=1.0`.
    pub fn progress_ratio(&self) -> f64 {
        let estimated = self.estimated_time.max(1) as f64;
        (self.total_time_spent / estimated).clamp(0.0, 1.0)
    }
}

/// Fields supplied when creating a task
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub link: String,
    pub notes: String,
    pub estimated_time: u32,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: Category::Other,
            priority: Priority::Medium,
            deadline: None,
            link: String::new(),
            notes: String::new(),
            estimated_time: 60,
        }
    }
}

/// Editable fields for an existing task; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskEdits {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub estimated_time: Option<u32>,
    pub notes: Option<String>,
}
