//! Read side: turns the store's rows into the list the view renders.

use crate::store::{StoreError, TodoStore};
use crate::todo::{Todo, TodoList};
use std::sync::Arc;
use tracing::debug;

/// Fetches every todo on each call. No caching, no retry.
#[derive(Clone)]
pub struct ListLoader {
    store: Arc<dyn TodoStore>,
}

impl ListLoader {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Load the current list.
    ///
    /// A store response without data yields an empty list. Row order is kept.
    ///
    /// # Errors
    ///
    /// Store faults are returned unchanged.
    pub fn load(&self) -> Result<TodoList, StoreError> {
        let Some(rows) = self.store.select_all()? else {
            debug!("Store returned no data, rendering empty list");
            return Ok(TodoList::default());
        };

        let todos: Vec<Todo> = rows.into_iter().map(Todo::from).collect();
        debug!(count = todos.len(), "Todos loaded");
        Ok(TodoList { todos })
    }
}
