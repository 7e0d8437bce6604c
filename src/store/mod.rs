//! # Store Module
//!
//! The remote table is the only shared mutable resource and the sole owner of
//! todo data. Everything else in the crate reaches it through the three
//! operations of [`TodoStore`].
//!
//! ## Implementations
//!
//! - [`RestStore`] - PostgREST/Supabase `/rest/v1/<table>` over blocking `reqwest`
//! - [`MemoryStore`] - process-local rows for local runs and tests
//!
//! Both are injected as `Arc<dyn TodoStore>` into the loader, the action
//! handler and the HTTP service.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::{RestStore, RestStoreConfig};

use crate::todo::{NewTodo, TodoId, TodoRow};
use std::fmt;
use std::sync::Arc;

/// Minimal CRUD surface of the todo table.
///
/// No transactions and no existence checks: `delete` of an unknown id is
/// whatever the backend does with it.
pub trait TodoStore: Send + Sync {
    /// Fetch every row in store order. `None` means the store returned no data.
    fn select_all(&self) -> Result<Option<Vec<TodoRow>>, StoreError>;

    /// Insert one row. The store assigns the id.
    fn insert(&self, todo: &NewTodo) -> Result<(), StoreError>;

    /// Delete the rows whose id equals `id`.
    fn delete(&self, id: &TodoId) -> Result<(), StoreError>;
}

impl<T: TodoStore + ?Sized> TodoStore for Arc<T> {
    fn select_all(&self) -> Result<Option<Vec<TodoRow>>, StoreError> {
        (**self).select_all()
    }

    fn insert(&self, todo: &NewTodo) -> Result<(), StoreError> {
        (**self).insert(todo)
    }

    fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}

/// Store or transport fault.
///
/// Not user-correctable. The HTTP service maps every variant to a 500.
#[derive(Debug)]
pub enum StoreError {
    /// The request never produced a response (DNS, connect, timeout).
    Transport(String),
    /// The store answered with a non-success status.
    Status {
        /// HTTP status returned by the store
        status: u16,
        /// Response body, usually a PostgREST error object
        body: String,
    },
    /// The response body could not be decoded into rows.
    Decode(String),
    /// The store is not usable (bad endpoint, client construction failed).
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "store request failed: {msg}"),
            StoreError::Status { status, body } => {
                write!(f, "store responded with status {status}: {body}")
            }
            StoreError::Decode(msg) => write!(f, "store response could not be decoded: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else if err.is_builder() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Status {
            status: 404,
            body: r#"{"message":"relation \"todo\" does not exist"}"#.into(),
        };
        assert!(err.to_string().starts_with("store responded with status 404"));
        assert_eq!(
            StoreError::Transport("connection refused".into()).to_string(),
            "store request failed: connection refused"
        );
    }

    #[test]
    fn test_arc_store_delegates() {
        let store: Arc<dyn TodoStore> = Arc::new(MemoryStore::new());
        store.insert(&NewTodo::titled("Buy milk")).unwrap();
        let rows = Arc::clone(&store).select_all().unwrap().unwrap();
        assert_eq!(rows.len(), 1);
    }
}
