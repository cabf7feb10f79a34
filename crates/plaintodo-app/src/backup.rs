//! Snapshots, diffs and one-level revert for task lists.

use anyhow::Result;
use plaintodo_core::{Diff, History, ListId, TaskList};
use tracing::debug;

use crate::store::{LineStore, load_list, load_snapshot, save_list, save_snapshot};

/// Manages the backup slot of each list in a [`LineStore`].
pub struct BackupManager<'a, S> {
    store: &'a S,
}

impl<'a, S: LineStore> BackupManager<'a, S> {
    /// Manage backups held by `store`.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Copy the current content of `list` into its backup slot and return it.
    ///
    /// # Errors
    /// Returns an error if the list cannot be read or the backup cannot be written.
    pub fn snapshot(&self, list: ListId) -> Result<TaskList> {
        let tasks = load_list(self.store, list)?;
        save_snapshot(self.store, list, &tasks)?;
        debug!(%list, lines = tasks.len(), "Took snapshot");
        Ok(tasks)
    }

    /// Snapshot both lists so the next mutation can be reverted as one unit.
    /// Returns `(pending, completed)` as they were snapshotted.
    ///
    /// # Errors
    /// Returns an error if either snapshot fails.
    pub fn checkpoint(&self) -> Result<(TaskList, TaskList)> {
        let pending = self.snapshot(ListId::Pending)?;
        let completed = self.snapshot(ListId::Completed)?;
        Ok((pending, completed))
    }

    /// Changes to `list` since its snapshot. Empty when no snapshot exists.
    ///
    /// # Errors
    /// Returns an error if the list or its backup cannot be read.
    pub fn diff(&self, list: ListId) -> Result<Diff> {
        let Some(snapshot) = load_snapshot(self.store, list)? else {
            return Ok(Diff::default());
        };
        let current = load_list(self.store, list)?;
        Ok(labelled_diff(list, &snapshot, &current))
    }

    /// Swap `list` with its snapshot. Reverting again restores the swapped-out
    /// content. Returns `false` without touching anything when no snapshot exists.
    ///
    /// # Errors
    /// Returns an error if reading or writing either slot fails.
    pub fn revert(&self, list: ListId) -> Result<bool> {
        let Some(snapshot) = load_snapshot(self.store, list)? else {
            debug!(%list, "No snapshot to revert to");
            return Ok(false);
        };
        let mut history = History::new(load_list(self.store, list)?, snapshot);
        history.toggle();
        save_list(self.store, list, history.current())?;
        save_snapshot(self.store, list, history.snapshot())?;
        debug!(%list, lines = history.current().len(), "Swapped list with snapshot");
        Ok(true)
    }
}

/// Diff between two revisions of `list`, labelled for display.
#[must_use]
pub fn labelled_diff(list: ListId, before: &TaskList, after: &TaskList) -> Diff {
    Diff::between(before.lines(), after.lines())
        .with_labels(format!("{list} (snapshot)"), list.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn seeded() -> MemoryStore {
        MemoryStore::with_lists(
            TaskList::from_lines(["a", "b", "c"]),
            TaskList::from_lines(["2024-01-01 z"]),
        )
    }

    #[test]
    fn snapshot_overwrites_previous_backup() -> Result<()> {
        let store = seeded();
        let backups = BackupManager::new(&store);
        store.set_list(ListId::Pending, TaskList::from_lines(["old"]));
        backups.snapshot(ListId::Pending)?;
        store.set_list(ListId::Pending, TaskList::from_lines(["new"]));
        backups.snapshot(ListId::Pending)?;

        assert_eq!(store.backup(ListId::Pending), Some(TaskList::from_lines(["new"])));
        assert_eq!(store.backup(ListId::Completed), None);
        Ok(())
    }

    #[test]
    fn diff_without_snapshot_is_empty() -> Result<()> {
        let store = seeded();
        assert!(BackupManager::new(&store).diff(ListId::Pending)?.is_empty());
        Ok(())
    }

    #[test]
    fn diff_compares_snapshot_with_current() -> Result<()> {
        let store = seeded();
        let backups = BackupManager::new(&store);
        backups.snapshot(ListId::Pending)?;
        store.set_list(ListId::Pending, TaskList::from_lines(["a", "c"]));

        let diff = backups.diff(ListId::Pending)?;
        assert_eq!(diff.removed().collect::<Vec<_>>(), vec!["b"]);
        assert!(diff.to_string().starts_with("--- pending (snapshot)\n+++ pending\n"));
        Ok(())
    }

    #[test]
    fn revert_without_snapshot_is_noop() -> Result<()> {
        let store = seeded();
        assert!(!BackupManager::new(&store).revert(ListId::Pending)?);
        assert_eq!(store.list(ListId::Pending), TaskList::from_lines(["a", "b", "c"]));
        assert!(store.save_log().is_empty());
        Ok(())
    }

    #[test]
    fn revert_toggles_between_snapshot_and_current() -> Result<()> {
        let store = seeded();
        let backups = BackupManager::new(&store);
        let original = backups.snapshot(ListId::Pending)?;
        let edited = TaskList::from_lines(["a"]);
        store.set_list(ListId::Pending, edited.clone());

        assert!(backups.revert(ListId::Pending)?);
        assert_eq!(store.list(ListId::Pending), original);
        assert_eq!(store.backup(ListId::Pending), Some(edited.clone()));

        assert!(backups.revert(ListId::Pending)?);
        assert_eq!(store.list(ListId::Pending), edited);
        assert_eq!(store.backup(ListId::Pending), Some(original));
        Ok(())
    }

    #[test]
    fn checkpoint_snapshots_both_lists() -> Result<()> {
        let store = seeded();
        let (pending, completed) = BackupManager::new(&store).checkpoint()?;
        assert_eq!(store.backup(ListId::Pending), Some(pending));
        assert_eq!(store.backup(ListId::Completed), Some(completed));
        Ok(())
    }
}
