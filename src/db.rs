//! Persistence port for the task list.
//!
//! The whole list is stored as one JSON document under a fixed storage key.
//! `TaskStorage` is the seam the store writes through; `JsonFileStorage` is the
//! on-disk implementation and `MemoryStorage` an in-memory stand-in for tests
//! and headless use.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::task::Task;

/// Key under which the task document is stored.
pub const STORAGE_KEY: &str = "sakura-todos";

/// Load/save access to the persisted task document.
pub trait TaskStorage {
    /// Read the stored task list. `Ok(None)` means no document exists yet.
    fn load(&self) -> Result<Option<Vec<Task>>>;

    /// Overwrite the stored document with a full snapshot.
    fn save(&mut self, tasks: &[Task]) -> Result<()>;
}

/// Encode a snapshot as the persisted document.
pub fn encode(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Decode a persisted document.
pub fn decode(document: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(document)?)
}

/// Task document stored as `<dir>/sakura-todos.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage for the document inside `dir`. The directory is created on first save.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        let document = match fs::read_to_string(&self.path) {
            Ok(document) => document,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&document).map(Some)
    }

    /// Writes a sibling temp file, then renames it over the document.
    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = encode(tasks)?;
        let tmp = self.path.with_extension("json.tmp");
        let written = write_file(&tmp, data.as_bytes()).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), count = tasks.len(), "saved task document");
        Ok(())
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.flush()
}

/// In-memory document, kept in its serialized form.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Option<String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding the given raw document.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            fail_writes: false,
        }
    }

    /// Make every subsequent `save` fail with an IO error.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        self.document.as_deref().map(decode).transpose()
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only").into());
        }
        self.document = Some(encode(tasks)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::seed_tasks;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_document() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::in_dir(tmp.path());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::in_dir(&tmp.path().join("nested"));
        let tasks = seed_tasks(Utc::now());
        storage.save(&tasks).unwrap();
        assert_eq!(storage.path().file_name().unwrap(), "sakura-todos.json");
        assert!(!storage.path().with_extension("json.tmp").exists());
        assert_eq!(storage.load().unwrap(), Some(tasks));
    }

    #[test]
    fn test_file_storage_malformed_document() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::in_dir(tmp.path());
        fs::write(storage.path(), "{ not json").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::in_dir(tmp.path());
        // A non-empty directory where the document belongs makes the rename fail.
        fs::create_dir(storage.path()).unwrap();
        fs::write(storage.path().join("keep"), "x").unwrap();

        assert!(storage.save(&seed_tasks(Utc::now())).is_err());
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_memory_storage_failing_writes() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes(true);
        assert!(storage.save(&[]).is_err());
        assert!(storage.document().is_none());
        storage.fail_writes(false);
        storage.save(&[]).unwrap();
        assert_eq!(storage.load().unwrap(), Some(Vec::new()));
    }
}
