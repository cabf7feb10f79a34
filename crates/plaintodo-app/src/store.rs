//! Storage abstraction shared by the mutation engine and reports.

use anyhow::{Context, Error, Result};
use plaintodo_core::{ListId, TaskList};
use plaintodo_store_fs::{FileStore, FileStoreError};

/// Minimal storage abstraction required by [`MutationEngine`](crate::MutationEngine)
/// and [`ReportService`](crate::ReportService).
pub trait LineStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Read a list. A missing list is created empty rather than reported.
    ///
    /// # Errors
    /// Returns a store-specific error when the list cannot be read or created.
    fn load(&self, list: ListId) -> Result<TaskList, Self::Error>;

    /// Replace the whole content of a list.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    fn save(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error>;

    /// Read the backup slot of a list; `None` when no snapshot was taken yet.
    ///
    /// # Errors
    /// Returns a store-specific error when an existing backup cannot be read.
    fn load_backup(&self, list: ListId) -> Result<Option<TaskList>, Self::Error>;

    /// Overwrite the backup slot of a list.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    fn save_backup(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error>;
}

impl<S: LineStore + ?Sized> LineStore for &S {
    type Error = S::Error;

    fn load(&self, list: ListId) -> Result<TaskList, Self::Error> {
        (**self).load(list)
    }

    fn save(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error> {
        (**self).save(list, tasks)
    }

    fn load_backup(&self, list: ListId) -> Result<Option<TaskList>, Self::Error> {
        (**self).load_backup(list)
    }

    fn save_backup(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error> {
        (**self).save_backup(list, tasks)
    }
}

impl LineStore for FileStore {
    type Error = FileStoreError;

    fn load(&self, list: ListId) -> Result<TaskList, Self::Error> {
        Self::load(self, list)
    }

    fn save(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error> {
        Self::save(self, list, tasks)
    }

    fn load_backup(&self, list: ListId) -> Result<Option<TaskList>, Self::Error> {
        Self::load_backup(self, list)
    }

    fn save_backup(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error> {
        Self::save_backup(self, list, tasks)
    }
}

pub(crate) fn load_list<S: LineStore>(store: &S, list: ListId) -> Result<TaskList> {
    store
        .load(list)
        .map_err(Into::<Error>::into)
        .with_context(|| format!("failed to load {list} list"))
}

pub(crate) fn save_list<S: LineStore>(store: &S, list: ListId, tasks: &TaskList) -> Result<()> {
    store
        .save(list, tasks)
        .map_err(Into::<Error>::into)
        .with_context(|| format!("failed to save {list} list"))
}

pub(crate) fn load_snapshot<S: LineStore>(store: &S, list: ListId) -> Result<Option<TaskList>> {
    store
        .load_backup(list)
        .map_err(Into::<Error>::into)
        .with_context(|| format!("failed to load {list} backup"))
}

pub(crate) fn save_snapshot<S: LineStore>(store: &S, list: ListId, tasks: &TaskList) -> Result<()> {
    store
        .save_backup(list, tasks)
        .map_err(Into::<Error>::into)
        .with_context(|| format!("failed to save {list} backup"))
}
