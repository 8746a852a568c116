use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Get the campus data directory - checks for a local .campus first, then
/// falls back to the global ~/.campus
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_campus(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".campus"))
}

/// Find a local .campus directory by walking up the directory tree
fn find_local_campus(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let campus_dir = current.join(".campus");
        if campus_dir.exists() && campus_dir.is_dir() {
            return Some(campus_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .campus directory in the current directory
pub fn init_local_campus() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let campus_dir = current_dir.join(".campus");

    if campus_dir.exists() {
        anyhow::bail!("Campus directory already exists: {}", campus_dir.display());
    }

    fs::create_dir_all(&campus_dir)
        .with_context(|| format!("Failed to create directory: {}", campus_dir.display()))?;

    Ok(campus_dir)
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    let mut temp_file =
        NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir().unwrap();
        assert!(dir.to_string_lossy().contains(".campus"));
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        let content = "{\"tasks\": []}";
        atomic_write(&test_file, content).unwrap();

        let read_content = read_file(&test_file).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.json");

        let content = read_file(&test_file).unwrap();
        assert_eq!(content, "");
    }

    #[test]
    fn test_atomic_write_overwrites_in_full() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "first version, longer than the second").unwrap();
        atomic_write(&test_file, "second").unwrap();

        assert_eq!(read_file(&test_file).unwrap(), "second");
    }
}
