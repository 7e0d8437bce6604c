//! Todo domain types
//!
//! [`TodoRow`] is the shape the store hands back, [`Todo`] is the record the
//! loader builds for the view, and [`NewTodo`] is the insert payload.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identifier assigned by the store.
///
/// PostgREST tables usually expose an integer primary key while other
/// backends use text (uuid, ulid). Both are kept as their textual form so the
/// rest of the crate never depends on the store's key type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for TodoId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Uint(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => TodoId(n.to_string()),
            RawId::Uint(n) => TodoId(n.to_string()),
            RawId::Text(s) => TodoId(s),
        })
    }
}

/// A row of the `todo` table as returned by the store.
///
/// Unknown columns are ignored; `created_at` is carried when the table has it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRow {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A todo as rendered by the view and returned by `GET /todos`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub done: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            done: row.done,
        }
    }
}

/// Insert payload. `done` is always `false` for new todos.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    pub title: String,
    pub done: bool,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
        }
    }
}

/// Loader output: `{ "todos": [...] }` in store order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

impl TodoList {
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}
