use super::{StoreError, TodoStore};
use crate::todo::{NewTodo, TodoId, TodoRow};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Process-local todo table.
///
/// Ids are sequential integers starting at 1, like a Postgres identity
/// column. Rows keep insertion order.
#[derive(Debug)]
pub struct MemoryStore {
    rows: Mutex<Vec<TodoRow>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the Vec half-written, so the
    // poisoned guard is still usable.
    fn rows(&self) -> MutexGuard<'_, Vec<TodoRow>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TodoStore for MemoryStore {
    fn select_all(&self) -> Result<Option<Vec<TodoRow>>, StoreError> {
        Ok(Some(self.rows().clone()))
    }

    fn insert(&self, todo: &NewTodo) -> Result<(), StoreError> {
        let id = TodoId::from(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(id = %id, "Memory store insert");
        self.rows().push(TodoRow {
            id,
            title: todo.title.clone(),
            done: todo.done,
            created_at: None,
        });
        Ok(())
    }

    fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|r| &r.id != id);
        debug!(id = %id, removed = before - rows.len(), "Memory store delete");
        Ok(())
    }
}
