//! File-backed storage for the pending and completed task lists.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use plaintodo_core::{ListId, TaskList};
use tracing::{debug, info};

mod error;

pub use error::FileStoreError;

/// Default suffix of backup files, as in `.todo.txt.bkp`.
pub const DEFAULT_BACKUP_SUFFIX: &str = "bkp";

/// Storage based on two plain text files plus one hidden backup per list.
#[derive(Debug, Clone)]
pub struct FileStore {
    pending: PathBuf,
    completed: PathBuf,
    backup_suffix: String,
}

impl FileStore {
    /// Store backed by the given pending and completed list files.
    pub fn new(pending: impl Into<PathBuf>, completed: impl Into<PathBuf>) -> Self {
        Self {
            pending: pending.into(),
            completed: completed.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_owned(),
        }
    }

    /// Use a different suffix for backup file names.
    #[must_use]
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// Path of the file holding `list`.
    #[must_use]
    pub fn path(&self, list: ListId) -> &Path {
        match list {
            ListId::Pending => &self.pending,
            ListId::Completed => &self.completed,
        }
    }

    /// Path of the hidden backup next to the file holding `list`.
    ///
    /// # Errors
    /// Returns [`FileStoreError::InvalidPath`] if the list path has no file name.
    pub fn backup_path(&self, list: ListId) -> Result<PathBuf, FileStoreError> {
        let path = self.path(list);
        let name = path
            .file_name()
            .ok_or_else(|| FileStoreError::InvalidPath(path.to_path_buf()))?;
        let backup_name = format!(".{}.{}", name.to_string_lossy(), self.backup_suffix);
        Ok(path.with_file_name(backup_name))
    }

    /// Create any missing list file as an empty file.
    ///
    /// # Errors
    /// Returns an error if a missing file cannot be created.
    pub fn ensure_files(&self) -> Result<(), FileStoreError> {
        for list in ListId::ALL {
            let path = self.path(list);
            if !path.exists() {
                info!(%list, path = %path.display(), "Missing list file, creating");
                write_file(path, "")?;
            }
        }
        Ok(())
    }

    /// Read a list, creating an empty file first if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or read, or is not UTF-8.
    pub fn load(&self, list: ListId) -> Result<TaskList, FileStoreError> {
        let path = self.path(list);
        match read_file(path)? {
            Some(text) => Ok(TaskList::parse(&text)),
            None => {
                info!(%list, path = %path.display(), "Missing list file, creating");
                write_file(path, "")?;
                Ok(TaskList::new())
            }
        }
    }

    /// Replace the whole content of a list.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, list: ListId, tasks: &TaskList) -> Result<(), FileStoreError> {
        let path = self.path(list);
        write_file(path, &tasks.to_text())?;
        debug!(%list, lines = tasks.len(), path = %path.display(), "Saved list");
        Ok(())
    }

    /// Read the backup of a list, if one has been taken.
    ///
    /// # Errors
    /// Returns an error if an existing backup cannot be read.
    pub fn load_backup(&self, list: ListId) -> Result<Option<TaskList>, FileStoreError> {
        let path = self.backup_path(list)?;
        Ok(read_file(&path)?.map(|text| TaskList::parse(&text)))
    }

    /// Overwrite the backup of a list.
    ///
    /// # Errors
    /// Returns an error if the backup cannot be written.
    pub fn save_backup(&self, list: ListId, tasks: &TaskList) -> Result<(), FileStoreError> {
        let path = self.backup_path(list)?;
        write_file(&path, &tasks.to_text())?;
        debug!(%list, lines = tasks.len(), path = %path.display(), "Saved backup");
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<Option<String>, FileStoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FileStoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| FileStoreError::NotUtf8 {
            path: path.to_path_buf(),
        })
}

fn write_file(path: &Path, contents: &str) -> Result<(), FileStoreError> {
    fs::write(path, contents).map_err(|source| FileStoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("todo.txt"), dir.path().join("done.txt"))
    }

    #[test]
    fn backup_path_is_hidden_sibling() -> Result<()> {
        let store = FileStore::new("lists/todo.txt", "done.txt");
        assert_eq!(
            store.backup_path(ListId::Pending)?,
            PathBuf::from("lists/.todo.txt.bkp")
        );
        assert_eq!(
            store.backup_path(ListId::Completed)?,
            PathBuf::from(".done.txt.bkp")
        );

        let custom = store.with_backup_suffix("orig");
        assert_eq!(
            custom.backup_path(ListId::Pending)?,
            PathBuf::from("lists/.todo.txt.orig")
        );
        Ok(())
    }

    #[test]
    fn backup_path_requires_file_name() {
        let store = FileStore::new("..", "done.txt");
        assert!(matches!(
            store.backup_path(ListId::Pending),
            Err(FileStoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn load_creates_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        let list = store.load(ListId::Pending)?;
        assert!(list.is_empty());
        assert!(dir.path().join("todo.txt").exists());
        assert!(!dir.path().join("done.txt").exists());
        Ok(())
    }

    #[test]
    fn ensure_files_creates_both_lists() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        fs::write(dir.path().join("todo.txt"), "keep me\n")?;

        store.ensure_files()?;
        assert_eq!(fs::read_to_string(dir.path().join("todo.txt"))?, "keep me\n");
        assert_eq!(fs::read_to_string(dir.path().join("done.txt"))?, "");
        Ok(())
    }

    #[test]
    fn save_and_load_preserve_bytes() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        fs::write(dir.path().join("todo.txt"), "one\ntwo")?;

        let list = store.load(ListId::Pending)?;
        assert_eq!(list.len(), 2);
        store.save(ListId::Pending, &list)?;
        assert_eq!(fs::read_to_string(dir.path().join("todo.txt"))?, "one\ntwo");
        Ok(())
    }

    #[test]
    fn missing_backup_is_none() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        assert!(store.load_backup(ListId::Pending)?.is_none());

        store.save_backup(ListId::Pending, &TaskList::from_lines(["old"]))?;
        assert_eq!(fs::read_to_string(dir.path().join(".todo.txt.bkp"))?, "old\n");
        assert_eq!(
            store.load_backup(ListId::Pending)?,
            Some(TaskList::from_lines(["old"]))
        );
        Ok(())
    }

    #[test]
    fn non_utf8_list_is_rejected_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let bytes = [0xff, 0xfe, b'\n'];
        fs::write(dir.path().join("todo.txt"), bytes)?;

        let Err(err) = store.load(ListId::Pending) else {
            panic!("expected non-UTF-8 list to fail");
        };
        assert!(matches!(err, FileStoreError::NotUtf8 { .. }));
        assert!(err.to_string().contains("todo.txt"));
        assert_eq!(fs::read(dir.path().join("todo.txt"))?, bytes);
        Ok(())
    }
}
