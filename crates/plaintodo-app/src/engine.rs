//! Range-addressed mutations of the task lists.
//!
//! Every mutation snapshots both lists before touching either one, so a single
//! [`MutationEngine::revert`] undoes it as a unit, moves between lists included.

use anyhow::Error;
use plaintodo_core::completion::{format_date, stamp, unstamp};
use plaintodo_core::{Diff, LineRange, ListId, TaskList};
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use crate::backup::{BackupManager, labelled_diff};
use crate::store::{LineStore, load_list, save_list};

/// Errors raised while mutating the task lists.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// The completion date could not be rendered.
    #[error("failed to format completion date: {0}")]
    DateFormat(#[from] time::error::Format),
    /// Backing store returned an error.
    #[error("store error: {0:#}")]
    Store(#[from] Error),
}

/// Applies edits to the task lists held by a [`LineStore`].
pub struct MutationEngine<S> {
    store: S,
    today: fn() -> Date,
}

impl<S> MutationEngine<S> {
    /// Engine stamping completions with the local date.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            today: local_today,
        }
    }

    /// Replace the source of completion dates.
    #[must_use]
    pub fn with_date_source(self, today: fn() -> Date) -> Self {
        Self { today, ..self }
    }

    /// Expose the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: LineStore> MutationEngine<S> {
    /// Remove the lines of `list` selected by `range`.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read or written.
    pub fn delete_range(&self, list: ListId, range: &str) -> Result<Diff, MutationError> {
        self.edit(list, range, |tasks, selected| {
            tasks.replace_range(selected, Vec::new());
        })
    }

    /// Replace the lines of `list` selected by `range` with `text`, one line
    /// per line of `text`.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read or written.
    pub fn replace_range(&self, list: ListId, range: &str, text: &str) -> Result<Diff, MutationError> {
        let replacement: Vec<String> = text.lines().map(str::to_owned).collect();
        self.edit(list, range, move |tasks, selected| {
            tasks.replace_range(selected, replacement);
        })
    }

    /// Append `text` to the end of `list`, one line per line of `text`.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read or written.
    pub fn append(&self, list: ListId, text: &str) -> Result<Diff, MutationError> {
        if text.trim().is_empty() {
            return Ok(Diff::default());
        }
        let (pending, completed) = BackupManager::new(&self.store).checkpoint()?;
        let mut tasks = pick(list, pending, completed);
        let before = tasks.clone();
        tasks.extend(text.lines().map(str::to_owned));
        save_list(&self.store, list, &tasks)?;
        debug!(%list, added = tasks.len() - before.len(), "Appended lines");
        Ok(labelled_diff(list, &before, &tasks))
    }

    /// Move the pending lines selected by `range` to the completed list,
    /// prefixed with today's date. Returns the changes to the pending list.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read or written.
    pub fn mark_done(&self, range: &str) -> Result<Diff, MutationError> {
        let Some(selected) = selection(range) else {
            return Ok(Diff::default());
        };
        if !self.selects_lines(ListId::Pending, &selected)? {
            return Ok(Diff::default());
        }
        let date = format_date((self.today)())?;

        let (mut pending, mut completed) = BackupManager::new(&self.store).checkpoint()?;
        let before = pending.clone();
        let moved = pending.slice(&selected);
        completed.extend(moved.iter().map(|line| stamp(line, &date)));
        pending.replace_range(&selected, Vec::new());

        save_list(&self.store, ListId::Completed, &completed)?;
        save_list(&self.store, ListId::Pending, &pending)?;
        debug!(range = %selected, moved = moved.len(), %date, "Marked tasks done");
        Ok(labelled_diff(ListId::Pending, &before, &pending))
    }

    /// Move the completed lines selected by `range` back to the pending list,
    /// dropping their completion date. Returns the changes to the pending list.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read or written.
    pub fn mark_undone(&self, range: &str) -> Result<Diff, MutationError> {
        let Some(selected) = selection(range) else {
            return Ok(Diff::default());
        };
        if !self.selects_lines(ListId::Completed, &selected)? {
            return Ok(Diff::default());
        }

        let (mut pending, mut completed) = BackupManager::new(&self.store).checkpoint()?;
        let before = pending.clone();
        let moved = completed.slice(&selected);
        pending.extend(moved.iter().map(|line| unstamp(line)));
        completed.replace_range(&selected, Vec::new());

        save_list(&self.store, ListId::Pending, &pending)?;
        save_list(&self.store, ListId::Completed, &completed)?;
        debug!(range = %selected, moved = moved.len(), "Marked tasks undone");
        Ok(labelled_diff(ListId::Pending, &before, &pending))
    }

    /// Swap both lists with their snapshots. Returns `false` when there was
    /// nothing to revert.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read or written.
    pub fn revert(&self) -> Result<bool, MutationError> {
        let backups = BackupManager::new(&self.store);
        let mut reverted = false;
        for list in ListId::ALL {
            reverted |= backups.revert(list)?;
        }
        Ok(reverted)
    }

    /// Changes to `list` since the last snapshot.
    ///
    /// # Errors
    /// Returns [`MutationError`] when the store cannot be read.
    pub fn diff(&self, list: ListId) -> Result<Diff, MutationError> {
        Ok(BackupManager::new(&self.store).diff(list)?)
    }

    fn edit<F>(&self, list: ListId, range: &str, apply: F) -> Result<Diff, MutationError>
    where
        F: FnOnce(&mut TaskList, &LineRange),
    {
        let Some(selected) = selection(range) else {
            return Ok(Diff::default());
        };
        if !self.selects_lines(list, &selected)? {
            return Ok(Diff::default());
        }
        let (pending, completed) = BackupManager::new(&self.store).checkpoint()?;
        let mut tasks = pick(list, pending, completed);
        let before = tasks.clone();
        apply(&mut tasks, &selected);
        save_list(&self.store, list, &tasks)?;
        debug!(%list, range = %selected, "Edited list");
        Ok(labelled_diff(list, &before, &tasks))
    }

    /// Whether `selected` covers at least one existing line of `list`. A range
    /// past the end must not replace the snapshot of the previous edit.
    fn selects_lines(&self, list: ListId, selected: &LineRange) -> Result<bool, MutationError> {
        let tasks = load_list(&self.store, list)?;
        if selected.resolve(tasks.len()).is_empty() {
            debug!(%list, range = %selected, lines = tasks.len(), "Range selects no lines");
            return Ok(false);
        }
        Ok(true)
    }
}

/// Parse a range, treating blank and malformed input as selecting nothing.
fn selection(range: &str) -> Option<LineRange> {
    match LineRange::parse(range) {
        Ok(selected) => selected,
        Err(err) => {
            warn!(%err, range, "Ignoring malformed range");
            None
        }
    }
}

fn pick(list: ListId, pending: TaskList, completed: TaskList) -> TaskList {
    match list {
        ListId::Pending => pending,
        ListId::Completed => completed,
    }
}

fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use anyhow::Result;
    use time::Month;

    fn fixed_date() -> Date {
        Date::from_calendar_date(2024, Month::March, 7).unwrap_or(Date::MIN)
    }

    fn engine_with(pending: &[&str], completed: &[&str]) -> (MutationEngine<MemoryStore>, MemoryStore) {
        let store = MemoryStore::with_lists(
            TaskList::from_lines(pending.iter().copied()),
            TaskList::from_lines(completed.iter().copied()),
        );
        let engine = MutationEngine::new(store.clone()).with_date_source(fixed_date);
        (engine, store)
    }

    #[test]
    fn delete_range_removes_lines_and_returns_diff() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b", "c", "d"], &[]);
        let diff = engine.delete_range(ListId::Pending, "2,3")?;

        assert_eq!(diff.removed().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(store.list(ListId::Pending).lines(), ["a", "d"]);
        assert_eq!(
            store.backup(ListId::Pending),
            Some(TaskList::from_lines(["a", "b", "c", "d"]))
        );
        Ok(())
    }

    #[test]
    fn replace_range_inserts_multiline_text() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b", "c"], &[]);
        let diff = engine.replace_range(ListId::Pending, "2", "x @home\ny")?;

        assert_eq!(store.list(ListId::Pending).lines(), ["a", "x @home", "y", "c"]);
        assert_eq!(diff.added().collect::<Vec<_>>(), vec!["x @home", "y"]);
        Ok(())
    }

    #[test]
    fn blank_and_malformed_ranges_are_noops() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b"], &["2024-01-01 z"]);
        for range in ["", "   ", "\t", "x", "0", "3,1"] {
            assert!(engine.delete_range(ListId::Pending, range)?.is_empty());
            assert!(engine.replace_range(ListId::Pending, range, "new")?.is_empty());
            assert!(engine.mark_done(range)?.is_empty());
            assert!(engine.mark_undone(range)?.is_empty());
        }
        assert_eq!(store.list(ListId::Pending).lines(), ["a", "b"]);
        assert_eq!(store.list(ListId::Completed).lines(), ["2024-01-01 z"]);
        assert!(store.save_log().is_empty());
        assert!(store.backup(ListId::Pending).is_none());
        Ok(())
    }

    #[test]
    fn out_of_range_selection_changes_nothing() -> Result<()> {
        let (engine, store) = engine_with(&["a"], &[]);
        assert!(engine.delete_range(ListId::Pending, "4,9")?.is_empty());
        assert!(engine.replace_range(ListId::Pending, "2,$", "x")?.is_empty());
        assert!(engine.mark_done("5")?.is_empty());
        assert!(engine.mark_undone("1")?.is_empty());
        assert_eq!(store.list(ListId::Pending).lines(), ["a"]);
        assert!(store.list(ListId::Completed).is_empty());
        assert!(store.save_log().is_empty());
        assert!(store.backup(ListId::Pending).is_none());
        assert!(store.backup(ListId::Completed).is_none());
        Ok(())
    }

    #[test]
    fn out_of_range_edit_keeps_previous_snapshot() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b", "c"], &[]);
        engine.delete_range(ListId::Pending, "1")?;
        let snapshot = store.backup(ListId::Pending);

        assert!(engine.delete_range(ListId::Pending, "9")?.is_empty());
        assert!(engine.mark_done("7,8")?.is_empty());
        assert_eq!(store.backup(ListId::Pending), snapshot);
        assert_eq!(store.save_log(), vec![ListId::Pending]);

        assert!(engine.revert()?);
        assert_eq!(store.list(ListId::Pending).lines(), ["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn mark_done_moves_stamped_lines() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b @home", "c"], &["2024-01-01 old"]);
        let diff = engine.mark_done("2,3")?;

        assert_eq!(store.list(ListId::Pending).lines(), ["a"]);
        assert_eq!(
            store.list(ListId::Completed).lines(),
            ["2024-01-01 old", "2024-03-07 b @home", "2024-03-07 c"]
        );
        assert_eq!(diff.removed().collect::<Vec<_>>(), vec!["b @home", "c"]);
        assert_eq!(
            store.save_log(),
            vec![ListId::Completed, ListId::Pending],
            "completed list is appended before pending lines are removed"
        );
        Ok(())
    }

    #[test]
    fn mark_undone_strips_date_and_appends_to_pending() -> Result<()> {
        let (engine, store) = engine_with(&["a"], &["2024-01-01 b", "2024-01-02 c @work"]);
        let diff = engine.mark_undone("2")?;

        assert_eq!(store.list(ListId::Pending).lines(), ["a", "c @work"]);
        assert_eq!(store.list(ListId::Completed).lines(), ["2024-01-01 b"]);
        assert_eq!(diff.added().collect::<Vec<_>>(), vec!["c @work"]);
        Ok(())
    }

    #[test]
    fn done_then_undone_restores_pending() -> Result<()> {
        let original = ["a", "  indented @home", "\tc"];
        let (engine, store) = engine_with(&original, &[]);
        engine.mark_done("2,3")?;
        assert_eq!(
            store.list(ListId::Completed).lines(),
            ["2024-03-07   indented @home", "2024-03-07 \tc"]
        );
        engine.mark_undone("1,2")?;

        assert_eq!(store.list(ListId::Pending), TaskList::from_lines(original));
        assert!(store.list(ListId::Completed).is_empty());
        Ok(())
    }

    #[test]
    fn revert_undoes_a_move_across_both_lists() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b"], &["2024-01-01 z"]);
        let pending = store.list(ListId::Pending);
        let completed = store.list(ListId::Completed);

        engine.mark_done("1")?;
        let moved_pending = store.list(ListId::Pending);
        let moved_completed = store.list(ListId::Completed);

        assert!(engine.revert()?);
        assert_eq!(store.list(ListId::Pending), pending);
        assert_eq!(store.list(ListId::Completed), completed);

        assert!(engine.revert()?);
        assert_eq!(store.list(ListId::Pending), moved_pending);
        assert_eq!(store.list(ListId::Completed), moved_completed);
        Ok(())
    }

    #[test]
    fn revert_without_snapshot_reports_nothing_done() -> Result<()> {
        let (engine, _store) = engine_with(&["a"], &[]);
        assert!(!engine.revert()?);
        assert!(engine.diff(ListId::Pending)?.is_empty());
        Ok(())
    }

    #[test]
    fn diff_after_mutation_matches_returned_diff() -> Result<()> {
        let (engine, _store) = engine_with(&["a", "b"], &[]);
        let returned = engine.delete_range(ListId::Pending, "1")?;
        assert_eq!(engine.diff(ListId::Pending)?, returned);
        Ok(())
    }

    #[test]
    fn append_adds_lines_and_is_revertible() -> Result<()> {
        let (engine, store) = engine_with(&["a"], &[]);
        assert!(engine.append(ListId::Pending, "  ")?.is_empty());

        let diff = engine.append(ListId::Pending, "b +shop")?;
        assert_eq!(diff.added().collect::<Vec<_>>(), vec!["b +shop"]);
        assert_eq!(store.list(ListId::Pending).lines(), ["a", "b +shop"]);

        engine.revert()?;
        assert_eq!(store.list(ListId::Pending).lines(), ["a"]);
        Ok(())
    }

    #[test]
    fn failed_save_surfaces_store_error_and_keeps_snapshot() -> Result<()> {
        let (engine, store) = engine_with(&["a", "b"], &[]);
        store.fail_saves_for(ListId::Pending);

        let Err(err) = engine.mark_done("1") else {
            panic!("saving the pending list must fail");
        };
        assert!(matches!(err, MutationError::Store(_)));
        assert!(err.to_string().contains("failed to save pending list"));
        assert_eq!(store.list(ListId::Completed).lines(), ["2024-03-07 a"]);
        assert_eq!(
            store.backup(ListId::Completed),
            Some(TaskList::new()),
            "snapshot still allows recovering the completed list"
        );
        Ok(())
    }
}
