//! # yarukoto
//!
//! A small todo-list web service. It lists, creates and deletes todos kept in
//! a hosted PostgREST table (Supabase or any PostgREST deployment), served by
//! `may` coroutines through `may_minihttp`.
//!
//! ## Architecture
//!
//! - **[`todo`]** - domain types (`Todo`, `TodoRow`, `NewTodo`, `TodoList`)
//! - **[`store`]** - the [`store::TodoStore`] capability and its REST and in-memory backends
//! - **[`loader`]** - read side: rows → ordered list, absent data → empty list
//! - **[`action`]** - write side: form → `ActionRequest` → at most one mutation
//! - **[`view`]** - minijinja page rendering
//! - **[`server`]** - HTTP service, request parsing and response writing
//! - **[`runtime_config`]** / **[`cli`]** - environment and flag configuration
//! - **[`otel`]** - structured logging setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Browser
//!     participant Service as AppService
//!     participant Action as ActionHandler
//!     participant Loader as ListLoader
//!     participant Store as TodoStore
//!
//!     Browser->>Service: POST / (action=create&title=Wash+car)
//!     Service->>Action: handle_form(fields)
//!     alt title empty
//!         Action-->>Service: Invalid(400, message)
//!     else
//!         Action->>Store: insert {title, done: false}
//!         Action-->>Service: NoContent
//!     end
//!     Service->>Loader: load()
//!     Loader->>Store: select_all()
//!     Store-->>Loader: rows | no data
//!     Loader-->>Service: TodoList
//!     Service-->>Browser: rendered page (200, or 400 with inline error)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use yarukoto::action::{ActionHandler, ActionOutcome, FormFields};
//! use yarukoto::loader::ListLoader;
//! use yarukoto::store::{MemoryStore, TodoStore};
//!
//! let store: Arc<dyn TodoStore> = Arc::new(MemoryStore::new());
//! let actions = ActionHandler::new(Arc::clone(&store));
//! let loader = ListLoader::new(store);
//!
//! let form = FormFields::parse(b"action=create&title=Buy+milk");
//! assert_eq!(actions.handle_form(&form).unwrap(), ActionOutcome::NoContent);
//! assert_eq!(loader.load().unwrap().todos[0].title, "Buy milk");
//! ```

pub mod action;
pub mod cli;
pub mod ids;
pub mod loader;
pub mod otel;
pub mod runtime_config;
pub mod server;
pub mod store;
pub mod todo;
pub mod view;

pub use action::{ActionError, ActionHandler, ActionOutcome, ActionRequest, FormFields};
pub use loader::ListLoader;
pub use store::{MemoryStore, RestStore, StoreError, TodoStore};
pub use todo::{NewTodo, Todo, TodoId, TodoList, TodoRow};
