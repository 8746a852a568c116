use super::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Durable load/save of named JSON documents inside one data directory.
///
/// Documents are read and overwritten whole; there are no partial updates
/// and no cross-document transactions. A document that is missing, empty or
/// fails to parse is reset to the caller-supplied default and the repaired
/// file is written back, so corruption never reaches the user as an error.
/// Filesystem failures (unreadable directory, disk full) still propagate.
#[derive(Debug, Clone)]
pub struct DocStore {
    dir: PathBuf,
}

impl DocStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(Self { dir })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Load the named document, falling back to `default` (and writing it
    /// back) when the file is missing, empty or corrupt.
    pub fn load<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = self.path(name);
        let content = read_file(&path)?;

        if content.trim().is_empty() {
            self.save(name, &default)?;
            return Ok(default);
        }

        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(document = name, %err, "corrupt document, resetting to default");
                self.save(name, &default)?;
                Ok(default)
            }
        }
    }

    /// Serialize `value` and overwrite the named document in full.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize document: {}", name))?;
        atomic_write(self.path(name), &json)?;
        tracing::debug!(document = name, "document saved");
        Ok(())
    }
}
