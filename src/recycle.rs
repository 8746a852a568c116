use crate::domain::{timestamp, Task};
use crate::error::Error;
use crate::persistence::{DocStore, RECYCLE_BIN_FILE};
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A soft-deleted task: the full task body plus deletion metadata.
///
/// The task fields sit flat next to `deleted_at`/`can_be_restored` on disk,
/// so a bin entry looks like the task it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecycleBinEntry {
    #[serde(flatten)]
    pub task: Task,
    #[serde(with = "timestamp")]
    pub deleted_at: NaiveDateTime,
    pub can_be_restored: bool,
}

impl RecycleBinEntry {
    /// Whole days since deletion, for display classification
    /// (today / yesterday / N days ago).
    pub fn age_in_days(&self, now: NaiveDateTime) -> i64 {
        (now - self.deleted_at).num_days()
    }
}

/// Holding area for soft-deleted tasks: restore or purge, never edit.
#[derive(Debug, Clone)]
pub struct RecycleBin {
    store: DocStore,
}

impl RecycleBin {
    pub fn new(store: DocStore) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> Result<Vec<RecycleBinEntry>> {
        self.store.load(RECYCLE_BIN_FILE, Vec::new())
    }

    fn save(&self, entries: &[RecycleBinEntry]) -> Result<()> {
        self.store.save(RECYCLE_BIN_FILE, &entries)
    }

    /// Append a deleted task to the bin.
    pub fn admit(&self, task: Task, now: NaiveDateTime) -> Result<RecycleBinEntry> {
        let entry = RecycleBinEntry {
            task,
            deleted_at: now,
            can_be_restored: true,
        };
        let mut entries = self.entries()?;
        entries.push(entry.clone());
        self.save(&entries)?;
        Ok(entry)
    }

    /// Remove the matching entry and return the task body, stripped of the
    /// bin metadata. The caller re-inserts it with a freshly assigned id.
    pub fn restore(&self, id: u64) -> Result<Task> {
        let mut entries = self.entries()?;
        let pos = entries
            .iter()
            .position(|e| e.task.id == id)
            .ok_or(Error::BinEntryNotFound(id))?;
        let entry = entries.remove(pos);
        self.save(&entries)?;
        Ok(entry.task)
    }

    /// Permanently remove one entry. Irreversible.
    pub fn purge(&self, id: u64) -> Result<()> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.task.id != id);
        if entries.len() == before {
            return Err(Error::BinEntryNotFound(id).into());
        }
        self.save(&entries)
    }

    /// Empty the bin. Irreversible.
    pub fn purge_all(&self) -> Result<()> {
        self.save(&[])
    }
}
