use crate::config::AppConfig;
use crate::feedback::{FeedbackIntake, NotifyOutcome};
use crate::mailer::{Notifier, SendGridNotifier};
use crate::persistence::DocStore;
use crate::recycle::RecycleBin;
use crate::tasks::TaskRepository;
use crate::timer::{TimeEntry, TimeTracker};
use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::Path;

/// The sidebar numbers: total tracked time and task completion.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickStats {
    pub total_minutes: f64,
    pub tasks_done: usize,
    pub tasks_total: usize,
}

/// Wires the four components over one data directory and owns the
/// cross-store operations (soft delete, restore, timer stop).
pub struct AppState {
    pub config: AppConfig,
    pub tasks: TaskRepository,
    pub timer: TimeTracker,
    pub bin: RecycleBin,
    pub feedback: FeedbackIntake,
}

impl AppState {
    /// Open the app over `dir`, creating it and its documents on first use.
    pub fn open<P: AsRef<Path>>(dir: P, config: AppConfig) -> Result<Self> {
        let store = DocStore::open(dir)?;

        let notifier: Option<Box<dyn Notifier>> = if config.mail_configured() {
            let key = config.sendgrid_api_key.clone().unwrap_or_default();
            Some(Box::new(SendGridNotifier::new(key)?))
        } else {
            None
        };
        let feedback = FeedbackIntake::new(
            store.clone(),
            notifier,
            config.mail_from.clone(),
            config.mail_to.clone(),
        );

        Ok(Self {
            tasks: TaskRepository::new(store.clone()),
            timer: TimeTracker::new(store.clone()),
            bin: RecycleBin::new(store),
            feedback,
            config,
        })
    }

    /// Move a task from the active collection into the recycle bin.
    ///
    /// Two documents are written with no transaction between them; a crash
    /// after the first write loses the task. Accepted for the single-user,
    /// local-disk deployment.
    pub fn delete_task(&self, id: u64, now: NaiveDateTime) -> Result<()> {
        let task = self.tasks.remove(id)?;
        self.bin.admit(task, now)?;
        Ok(())
    }

    /// Bring a task back from the bin under a freshly assigned id.
    pub fn restore_task(&self, bin_id: u64) -> Result<crate::domain::Task> {
        let body = self.bin.restore(bin_id)?;
        self.tasks.insert_with_new_id(body)
    }

    /// Stop the running timer, recording one time entry.
    pub fn stop_timer(&mut self, now: NaiveDateTime) -> Result<TimeEntry> {
        self.timer.stop(&self.tasks, now)
    }

    /// Headline numbers for the sidebar.
    pub fn quick_stats(&self) -> Result<QuickStats> {
        let tasks = self.tasks.all()?;
        let entries = self.timer.entries()?;
        Ok(QuickStats {
            total_minutes: entries.iter().map(|e| e.duration_minutes).sum(),
            tasks_done: tasks.iter().filter(|t| t.done).count(),
            tasks_total: tasks.len(),
        })
    }

    /// Feedback outcome rendered as the informational note the user sees.
    pub fn describe_outcome(outcome: &NotifyOutcome) -> &'static str {
        match outcome {
            NotifyOutcome::Sent => "Feedback sent successfully!",
            NotifyOutcome::Skipped => "Feedback saved locally (email not configured).",
            NotifyOutcome::Failed(_) => "Feedback saved locally; email could not be sent.",
        }
    }
}
