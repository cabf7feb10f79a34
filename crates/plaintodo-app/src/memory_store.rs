//! In-memory [`LineStore`] used by tests and by callers that want to preview
//! mutations without touching files.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Error, anyhow};
use plaintodo_core::{ListId, TaskList};

use crate::store::LineStore;

/// Shared, cloneable in-memory store. Clones see the same lists.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    lists: Mutex<BTreeMap<ListId, TaskList>>,
    backups: Mutex<BTreeMap<ListId, TaskList>>,
    failing_saves: Mutex<BTreeSet<ListId>>,
    save_log: Mutex<Vec<ListId>>,
}

impl MemoryStore {
    /// Store seeded with both lists.
    #[must_use]
    pub fn with_lists(pending: TaskList, completed: TaskList) -> Self {
        let store = Self::default();
        store.set_list(ListId::Pending, pending);
        store.set_list(ListId::Completed, completed);
        store
    }

    /// Current content of a list (empty if never written).
    #[must_use]
    pub fn list(&self, list: ListId) -> TaskList {
        guard(&self.inner.lists).get(&list).cloned().unwrap_or_default()
    }

    /// Current backup of a list.
    #[must_use]
    pub fn backup(&self, list: ListId) -> Option<TaskList> {
        guard(&self.inner.backups).get(&list).cloned()
    }

    /// Replace a list without going through the backup machinery.
    pub fn set_list(&self, list: ListId, tasks: TaskList) {
        guard(&self.inner.lists).insert(list, tasks);
    }

    /// Make every later `save` of `list` fail.
    pub fn fail_saves_for(&self, list: ListId) {
        guard(&self.inner.failing_saves).insert(list);
    }

    /// Lists saved so far, in order.
    #[must_use]
    pub fn save_log(&self) -> Vec<ListId> {
        guard(&self.inner.save_log).clone()
    }
}

impl LineStore for MemoryStore {
    type Error = Error;

    fn load(&self, list: ListId) -> Result<TaskList, Self::Error> {
        Ok(guard(&self.inner.lists).entry(list).or_default().clone())
    }

    fn save(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error> {
        if guard(&self.inner.failing_saves).contains(&list) {
            return Err(anyhow!("refusing to save {list} list"));
        }
        guard(&self.inner.save_log).push(list);
        guard(&self.inner.lists).insert(list, tasks.clone());
        Ok(())
    }

    fn load_backup(&self, list: ListId) -> Result<Option<TaskList>, Self::Error> {
        Ok(self.backup(list))
    }

    fn save_backup(&self, list: ListId, tasks: &TaskList) -> Result<(), Self::Error> {
        guard(&self.inner.backups).insert(list, tasks.clone());
        Ok(())
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
