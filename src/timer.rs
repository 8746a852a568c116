use crate::domain::{timestamp, Task};
use crate::error::Error;
use crate::persistence::{DocStore, TIME_TRACKING_FILE};
use crate::tasks::TaskRepository;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One immutable record of a timer session against a task.
///
/// `task_id` is a reference, not ownership: the task may have been edited or
/// soft-deleted since, so `task_title` keeps the name as it was known when
/// the entry was written. `duration_minutes` is stored redundantly for
/// display and matches the two timestamps at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub task_id: u64,
    pub task_title: String,
    #[serde(with = "timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end_time: NaiveDateTime,
    pub duration_minutes: f64,
    /// Calendar date of `start_time`
    pub date: NaiveDate,
}

/// The single process-wide timer: idle, or bound to exactly one task.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerState {
    Idle,
    Running {
        task_id: u64,
        task_title: String,
        started_at: NaiveDateTime,
    },
    Paused {
        task_id: u64,
        task_title: String,
        started_at: NaiveDateTime,
    },
}

/// Start/pause/stop timer bound to at most one task at a time.
///
/// State lives only in memory; an interrupted process loses the in-flight
/// timer and writes no partial entry. Stopping appends one `TimeEntry` to
/// the log and accumulates the duration into the task's total.
///
/// Pausing deliberately keeps the original `started_at`, so wall-clock time
/// spent paused is still counted when the timer is stopped. This matches the
/// behavior users of the original dashboard rely on when reading back their
/// recorded times.
#[derive(Debug)]
pub struct TimeTracker {
    state: TimerState,
    store: DocStore,
}

impl TimeTracker {
    pub fn new(store: DocStore) -> Self {
        Self {
            state: TimerState::Idle,
            store,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, TimerState::Idle)
    }

    /// Bind the timer to `task` and start counting. Rejected if a timer is
    /// already active for any task, running or paused.
    pub fn start(&mut self, task: &Task, now: NaiveDateTime) -> Result<(), Error> {
        match &self.state {
            TimerState::Idle => {
                self.state = TimerState::Running {
                    task_id: task.id,
                    task_title: task.title.clone(),
                    started_at: now,
                };
                Ok(())
            }
            TimerState::Running { task_id, .. } | TimerState::Paused { task_id, .. } => {
                Err(Error::TimerBusy(*task_id))
            }
        }
    }

    /// Pause a running timer. No time entry is written; the task binding and
    /// the original start time are retained.
    pub fn pause(&mut self) -> Result<(), Error> {
        match std::mem::replace(&mut self.state, TimerState::Idle) {
            TimerState::Running {
                task_id,
                task_title,
                started_at,
            } => {
                self.state = TimerState::Paused {
                    task_id,
                    task_title,
                    started_at,
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(Error::TimerNotRunning)
            }
        }
    }

    /// Resume a paused timer, reusing the original start time.
    pub fn resume(&mut self) -> Result<(), Error> {
        match std::mem::replace(&mut self.state, TimerState::Idle) {
            TimerState::Paused {
                task_id,
                task_title,
                started_at,
            } => {
                self.state = TimerState::Running {
                    task_id,
                    task_title,
                    started_at,
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(Error::TimerNotPaused)
            }
        }
    }

    /// Stop the timer (from running or paused), append one time entry and
    /// add the duration to the task's total via the repository.
    pub fn stop(&mut self, repo: &TaskRepository, now: NaiveDateTime) -> anyhow::Result<TimeEntry> {
        let (task_id, task_title, started_at) =
            match std::mem::replace(&mut self.state, TimerState::Idle) {
                TimerState::Running {
                    task_id,
                    task_title,
                    started_at,
                }
                | TimerState::Paused {
                    task_id,
                    task_title,
                    started_at,
                } => (task_id, task_title, started_at),
                TimerState::Idle => return Err(Error::TimerNotRunning.into()),
            };

        let minutes = round2((now - started_at).num_milliseconds() as f64 / 60_000.0);

        // Refresh the title snapshot while the task still exists
        let title = repo
            .get(task_id)?
            .map(|t| t.title)
            .unwrap_or(task_title);

        let entry = TimeEntry {
            task_id,
            task_title: title,
            start_time: started_at,
            end_time: now,
            duration_minutes: minutes,
            date: started_at.date(),
        };

        let mut entries = self.entries()?;
        entries.push(entry.clone());
        self.store.save(TIME_TRACKING_FILE, &entries)?;

        repo.add_time(task_id, minutes)?;

        Ok(entry)
    }

    /// The full append-only time entry log.
    pub fn entries(&self) -> anyhow::Result<Vec<TimeEntry>> {
        self.store.load(TIME_TRACKING_FILE, Vec::new())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Priority, TaskDraft};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn setup() -> (tempfile::TempDir, TaskRepository, TimeTracker) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DocStore::open(temp_dir.path()).unwrap();
        let repo = TaskRepository::new(store.clone());
        let tracker = TimeTracker::new(store);
        (temp_dir, repo, tracker)
    }

    fn make_task(repo: &TaskRepository, title: &str) -> Task {
        repo.create(TaskDraft {
            title: title.to_string(),
            category: Category::Enrollment,
            priority: Priority::High,
            ..TaskDraft::default()
        })
        .unwrap()
    }

    #[test]
    fn test_second_start_is_rejected() {
        let (_dir, repo, mut tracker) = setup();
        let a = make_task(&repo, "Task A");
        let b = make_task(&repo, "Task B");
        let now = ts("2025-06-10 09:00:00");

        tracker.start(&a, now).unwrap();
        let err = tracker.start(&b, now).unwrap_err();
        assert_eq!(err, Error::TimerBusy(a.id));

        // Still bound to the first task
        match tracker.state() {
            TimerState::Running { task_id, .. } => assert_eq!(*task_id, a.id),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_start_rejected_while_paused() {
        let (_dir, repo, mut tracker) = setup();
        let a = make_task(&repo, "Task A");
        let b = make_task(&repo, "Task B");

        tracker.start(&a, ts("2025-06-10 09:00:00")).unwrap();
        tracker.pause().unwrap();
        assert_eq!(tracker.start(&b, ts("2025-06-10 09:05:00")), Err(Error::TimerBusy(a.id)));
    }

    #[test]
    fn test_stop_produces_one_entry_and_one_accumulation() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Complete enrollment");
        let t0 = ts("2025-06-10 09:00:00");

        tracker.start(&task, t0).unwrap();
        let entry = tracker.stop(&repo, t0 + Duration::seconds(90)).unwrap();

        assert_eq!(entry.duration_minutes, 1.5);
        assert_eq!(entry.task_id, task.id);
        assert_eq!(entry.task_title, "Complete enrollment");
        assert_eq!(entry.date, t0.date());
        assert!(entry.end_time > entry.start_time);

        let entries = tracker.entries().unwrap();
        assert_eq!(entries.len(), 1);

        let reloaded = repo.get(task.id).unwrap().unwrap();
        assert_eq!(reloaded.total_time_spent, 1.5);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_pause_does_not_write_an_entry() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Task");

        tracker.start(&task, ts("2025-06-10 09:00:00")).unwrap();
        tracker.pause().unwrap();

        assert!(tracker.entries().unwrap().is_empty());
        assert_eq!(repo.get(task.id).unwrap().unwrap().total_time_spent, 0.0);
    }

    #[test]
    fn test_paused_wall_clock_time_counts_on_stop() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Task");
        let t0 = ts("2025-06-10 09:00:00");

        tracker.start(&task, t0).unwrap();
        tracker.pause().unwrap();
        tracker.resume().unwrap();

        // 10 minutes of wall clock elapsed, pause included
        let entry = tracker.stop(&repo, t0 + Duration::minutes(10)).unwrap();
        assert_eq!(entry.duration_minutes, 10.0);
        assert_eq!(entry.start_time, t0);
    }

    #[test]
    fn test_stop_from_paused_is_allowed() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Task");
        let t0 = ts("2025-06-10 09:00:00");

        tracker.start(&task, t0).unwrap();
        tracker.pause().unwrap();
        let entry = tracker.stop(&repo, t0 + Duration::minutes(2)).unwrap();
        assert_eq!(entry.duration_minutes, 2.0);
    }

    #[test]
    fn test_invalid_transitions() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Task");

        assert_eq!(tracker.pause(), Err(Error::TimerNotRunning));
        assert_eq!(tracker.resume(), Err(Error::TimerNotPaused));
        let err = tracker.stop(&repo, ts("2025-06-10 09:00:00")).unwrap_err();
        assert_eq!(err.downcast::<Error>().unwrap(), Error::TimerNotRunning);

        tracker.start(&task, ts("2025-06-10 09:00:00")).unwrap();
        assert_eq!(tracker.resume(), Err(Error::TimerNotPaused));
    }

    #[test]
    fn test_stop_after_task_deleted_keeps_snapshot_title() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Soon deleted");
        let t0 = ts("2025-06-10 09:00:00");

        tracker.start(&task, t0).unwrap();
        repo.remove(task.id).unwrap();

        let entry = tracker.stop(&repo, t0 + Duration::minutes(1)).unwrap();
        assert_eq!(entry.task_title, "Soon deleted");
        assert_eq!(entry.duration_minutes, 1.0);
        // No task to accumulate into; the entry is still history
        assert_eq!(tracker.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_duration_rounds_to_two_decimals() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Task");
        let t0 = ts("2025-06-10 09:00:00");

        tracker.start(&task, t0).unwrap();
        let entry = tracker.stop(&repo, t0 + Duration::seconds(100)).unwrap();
        // 100s = 1.666.. minutes
        assert_eq!(entry.duration_minutes, 1.67);
    }

    #[test]
    fn test_entry_log_round_trips_through_store() {
        let (_dir, repo, mut tracker) = setup();
        let task = make_task(&repo, "Task");
        let t0 = ts("2025-06-10 09:00:00");

        tracker.start(&task, t0).unwrap();
        tracker.stop(&repo, t0 + Duration::minutes(3)).unwrap();
        tracker.start(&task, t0 + Duration::minutes(5)).unwrap();
        tracker.stop(&repo, t0 + Duration::minutes(7)).unwrap();

        let entries = tracker.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].duration_minutes, 3.0);
        assert_eq!(entries[1].duration_minutes, 2.0);
    }
}
