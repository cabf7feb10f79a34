use std::mem;

use crate::diff::Diff;
use crate::list::TaskList;

/// Current content of a list paired with its last snapshot.
///
/// Reverting swaps the two slots, so reverting twice restores the original pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    current: TaskList,
    snapshot: TaskList,
}

impl History {
    /// Pair the persisted content with its snapshot.
    #[must_use]
    pub const fn new(current: TaskList, snapshot: TaskList) -> Self {
        Self { current, snapshot }
    }

    /// Swap current content and snapshot.
    pub const fn toggle(&mut self) {
        mem::swap(&mut self.current, &mut self.snapshot);
    }

    /// Content that should be persisted as the list.
    #[must_use]
    pub const fn current(&self) -> &TaskList {
        &self.current
    }

    /// Content that should be persisted as the backup.
    #[must_use]
    pub const fn snapshot(&self) -> &TaskList {
        &self.snapshot
    }

    /// Changes from the snapshot to the current content.
    #[must_use]
    pub fn diff(&self) -> Diff {
        Diff::between(self.snapshot.lines(), self.current.lines())
    }

    /// Split into `(current, snapshot)`.
    #[must_use]
    pub fn into_parts(self) -> (TaskList, TaskList) {
        (self.current, self.snapshot)
    }
}
