use crate::domain::{Task, TaskDraft, TaskEdits};
use crate::error::Error;
use crate::persistence::{DocStore, TASKS_FILE};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// On-disk shape of the tasks document: the collection plus the id counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDocument {
    pub tasks: Vec<Task>,
    pub next_id: u64,
}

impl Default for TaskDocument {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

/// CRUD over the task collection.
///
/// Every operation is a whole read-modify-write cycle against `data.json`,
/// matching the single-user, request-driven model. Ids come from the stored
/// `next_id` counter and are never reused, including for restored tasks.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    store: DocStore,
}

impl TaskRepository {
    pub fn new(store: DocStore) -> Self {
        Self { store }
    }

    fn load_doc(&self) -> Result<TaskDocument> {
        self.store.load(TASKS_FILE, TaskDocument::default())
    }

    fn save_doc(&self, doc: &TaskDocument) -> Result<()> {
        self.store.save(TASKS_FILE, doc)
    }

    /// Create a task from the draft, assigning the next id.
    pub fn create(&self, draft: TaskDraft) -> Result<Task> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::EmptyTitle.into());
        }
        if draft.estimated_time < 1 {
            return Err(Error::InvalidEstimate.into());
        }

        let mut doc = self.load_doc()?;
        let task = Task {
            id: doc.next_id,
            title,
            category: draft.category,
            priority: draft.priority,
            deadline: draft.deadline,
            link: draft.link,
            notes: draft.notes,
            done: false,
            estimated_time: draft.estimated_time,
            total_time_spent: 0.0,
        };
        doc.next_id += 1;
        doc.tasks.push(task.clone());
        self.save_doc(&doc)?;
        Ok(task)
    }

    /// Replace the editable fields of an existing task.
    pub fn update(&self, id: u64, edits: TaskEdits) -> Result<Task> {
        if let Some(title) = &edits.title {
            if title.trim().is_empty() {
                return Err(Error::EmptyTitle.into());
            }
        }
        if edits.estimated_time == Some(0) {
            return Err(Error::InvalidEstimate.into());
        }

        let mut doc = self.load_doc()?;
        let task = doc
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        if let Some(title) = edits.title {
            task.title = title.trim().to_string();
        }
        if let Some(category) = edits.category {
            task.category = category;
        }
        if let Some(priority) = edits.priority {
            task.priority = priority;
        }
        if let Some(estimated) = edits.estimated_time {
            task.estimated_time = estimated;
        }
        if let Some(notes) = edits.notes {
            task.notes = notes;
        }

        let updated = task.clone();
        self.save_doc(&doc)?;
        Ok(updated)
    }

    /// Flip the done flag; returns the new value.
    pub fn toggle_done(&self, id: u64) -> Result<bool> {
        let mut doc = self.load_doc()?;
        let task = doc
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        task.done = !task.done;
        let done = task.done;
        self.save_doc(&doc)?;
        Ok(done)
    }

    /// Add tracked minutes to a task's running total.
    ///
    /// A missing task is tolerated: the time entry it came from is
    /// independent history and the task may have been soft-deleted while
    /// the timer ran.
    pub fn add_time(&self, id: u64, minutes: f64) -> Result<()> {
        let mut doc = self.load_doc()?;
        match doc.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.total_time_spent += minutes;
                self.save_doc(&doc)?;
            }
            None => {
                warn!(task_id = id, "tracked time for a task no longer active");
            }
        }
        Ok(())
    }

    /// Remove a task from the active collection and return it.
    ///
    /// Callers pair this with `RecycleBin::admit`; the two writes are not
    /// transactional.
    pub fn remove(&self, id: u64) -> Result<Task> {
        let mut doc = self.load_doc()?;
        let pos = doc
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        let task = doc.tasks.remove(pos);
        self.save_doc(&doc)?;
        Ok(task)
    }

    /// Re-insert a task body with a freshly assigned id (used by restore).
    /// The original id is never reused, so restored tasks cannot collide
    /// with tasks created after the deletion.
    pub fn insert_with_new_id(&self, mut task: Task) -> Result<Task> {
        let mut doc = self.load_doc()?;
        task.id = doc.next_id;
        doc.next_id += 1;
        doc.tasks.push(task.clone());
        self.save_doc(&doc)?;
        Ok(task)
    }

    pub fn get(&self, id: u64) -> Result<Option<Task>> {
        Ok(self.load_doc()?.tasks.into_iter().find(|t| t.id == id))
    }

    pub fn all(&self) -> Result<Vec<Task>> {
        Ok(self.load_doc()?.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Priority};
    use pretty_assertions::assert_eq;

    fn repo() -> (tempfile::TempDir, TaskRepository) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DocStore::open(temp_dir.path()).unwrap();
        (temp_dir, TaskRepository::new(store))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            category: Category::Organizational,
            priority: Priority::Medium,
            ..TaskDraft::default()
        }
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let (_dir, repo) = repo();
        let a = repo.create(draft("Pick up campus card")).unwrap();
        let b = repo.create(draft("Open bank account")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(!a.done);
        assert_eq!(a.total_time_spent, 0.0);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let (_dir, repo) = repo();
        let err = repo.create(draft("   ")).unwrap_err();
        assert_eq!(err.downcast::<Error>().unwrap(), Error::EmptyTitle);
        assert!(repo.all().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_zero_estimate() {
        let (_dir, repo) = repo();
        let mut d = draft("Register for exams");
        d.estimated_time = 0;
        let err = repo.create(d).unwrap_err();
        assert_eq!(err.downcast::<Error>().unwrap(), Error::InvalidEstimate);
    }

    #[test]
    fn test_update_replaces_editable_fields() {
        let (_dir, repo) = repo();
        let task = repo.create(draft("Find housing")).unwrap();

        let updated = repo
            .update(
                task.id,
                TaskEdits {
                    title: Some("Find student housing".to_string()),
                    category: Some(Category::Housing),
                    priority: Some(Priority::High),
                    estimated_time: Some(240),
                    notes: Some("check dorm waitlist".to_string()),
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Find student housing");
        assert_eq!(updated.category, Category::Housing);
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.estimated_time, 240);
        assert_eq!(updated.notes, "check dorm waitlist");
        assert_eq!(repo.get(task.id).unwrap().unwrap(), updated);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let (_dir, repo) = repo();
        let err = repo.update(42, TaskEdits::default()).unwrap_err();
        assert_eq!(err.downcast::<Error>().unwrap(), Error::TaskNotFound(42));
    }

    #[test]
    fn test_toggle_done_flips() {
        let (_dir, repo) = repo();
        let task = repo.create(draft("Pay semester fee")).unwrap();
        assert!(repo.toggle_done(task.id).unwrap());
        assert!(!repo.toggle_done(task.id).unwrap());
    }

    #[test]
    fn test_remove_returns_task_and_drops_it() {
        let (_dir, repo) = repo();
        let task = repo.create(draft("Pick up campus card")).unwrap();
        let removed = repo.remove(task.id).unwrap();
        assert_eq!(removed.title, "Pick up campus card");
        assert!(repo.get(task.id).unwrap().is_none());

        let err = repo.remove(task.id).unwrap_err();
        assert_eq!(
            err.downcast::<Error>().unwrap(),
            Error::TaskNotFound(task.id)
        );
    }

    #[test]
    fn test_insert_with_new_id_never_reuses_ids() {
        let (_dir, repo) = repo();
        let a = repo.create(draft("First")).unwrap();
        let removed = repo.remove(a.id).unwrap();
        let b = repo.create(draft("Second")).unwrap();

        let restored = repo.insert_with_new_id(removed).unwrap();
        assert!(restored.id > b.id);
        assert_ne!(restored.id, a.id);

        // The counter keeps moving afterwards
        let c = repo.create(draft("Third")).unwrap();
        assert!(c.id > restored.id);
    }

    #[test]
    fn test_add_time_accumulates() {
        let (_dir, repo) = repo();
        let task = repo.create(draft("Enrollment paperwork")).unwrap();
        repo.add_time(task.id, 1.5).unwrap();
        repo.add_time(task.id, 2.25).unwrap();
        let reloaded = repo.get(task.id).unwrap().unwrap();
        assert_eq!(reloaded.total_time_spent, 3.75);
    }

    #[test]
    fn test_add_time_for_missing_task_is_tolerated() {
        let (_dir, repo) = repo();
        repo.add_time(99, 5.0).unwrap();
        assert!(repo.all().unwrap().is_empty());
    }

    #[test]
    fn test_counter_survives_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        {
            let store = DocStore::open(temp_dir.path()).unwrap();
            let repo = TaskRepository::new(store);
            repo.create(draft("One")).unwrap();
            repo.create(draft("Two")).unwrap();
        }
        let store = DocStore::open(temp_dir.path()).unwrap();
        let repo = TaskRepository::new(store);
        let third = repo.create(draft("Three")).unwrap();
        assert_eq!(third.id, 3);
    }
}
