//! # Action Module
//!
//! Write side of the todo page. A submitted form is parsed once into an
//! [`ActionRequest`] and then matched exhaustively by [`ActionHandler`].
//!
//! ## Form contract
//!
//! | `action` | other fields | effect |
//! |----------|--------------|--------|
//! | absent   | -            | nothing |
//! | `delete` | `id`         | one delete filtered on `id` |
//! | `create` | `title`      | one insert `{title, done: false}`, or a 400 when `title` is empty |
//! | other    | -            | nothing |
//!
//! Success is "no content"; the caller re-runs the loader to show the new state.

use crate::store::{StoreError, TodoStore};
use crate::todo::{NewTodo, TodoId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Message returned when a todo is created without a title.
pub const TITLE_REQUIRED: &str = "Please enter a title";

/// Name of the discriminator field.
pub const ACTION_FIELD: &str = "action";

/// Decoded `application/x-www-form-urlencoded` fields in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    /// Decode a urlencoded body. Invalid UTF-8 is replaced, never rejected.
    pub fn parse(body: &[u8]) -> Self {
        Self(
            url::form_urlencoded::parse(body)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// What a submitted form asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// No `action` field at all.
    NoAction,
    /// `action=delete`. A missing `id` field is passed through as an empty id.
    Delete { id: TodoId },
    /// `action=create`. `None` when the `title` field is missing.
    Create { title: Option<String> },
    /// Any other `action` value.
    Unknown(String),
}

impl ActionRequest {
    pub fn from_form(form: &FormFields) -> Self {
        let Some(action) = form.get(ACTION_FIELD) else {
            return ActionRequest::NoAction;
        };
        match action {
            "delete" => ActionRequest::Delete {
                id: TodoId::new(form.get("id").unwrap_or_default()),
            },
            "create" => ActionRequest::Create {
                title: form.get("title").map(str::to_owned),
            },
            other => ActionRequest::Unknown(other.to_owned()),
        }
    }
}

/// User-correctable failure, rendered next to the creation form.
///
/// Serializes as `{"error": "<message>"}`; the status travels out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionError {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip)]
    pub status: u16,
}

impl ActionError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 400,
        }
    }
}

/// Result of a handled submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Mutation done, or nothing to do.
    NoContent,
    /// Rejected before reaching the store.
    Invalid(ActionError),
}

/// Dispatches create/delete submissions against the store.
#[derive(Clone)]
pub struct ActionHandler {
    store: Arc<dyn TodoStore>,
}

impl ActionHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Parse and handle a form in one step.
    ///
    /// # Errors
    ///
    /// Store faults are returned unchanged.
    pub fn handle_form(&self, form: &FormFields) -> Result<ActionOutcome, StoreError> {
        self.handle(ActionRequest::from_form(form))
    }

    /// Run the mutation selected by `request`. At most one store call.
    ///
    /// # Errors
    ///
    /// Store faults are returned unchanged.
    pub fn handle(&self, request: ActionRequest) -> Result<ActionOutcome, StoreError> {
        match request {
            ActionRequest::NoAction => {
                debug!("No action submitted");
                Ok(ActionOutcome::NoContent)
            }
            ActionRequest::Unknown(action) => {
                debug!(action = %action, "Ignoring unrecognized action");
                Ok(ActionOutcome::NoContent)
            }
            ActionRequest::Delete { id } => {
                self.store.delete(&id)?;
                info!(id = %id, "Todo deleted");
                Ok(ActionOutcome::NoContent)
            }
            ActionRequest::Create { title } => match title {
                Some(title) if !title.is_empty() => {
                    self.store.insert(&NewTodo::titled(title.as_str()))?;
                    info!(title = %title, "Todo created");
                    Ok(ActionOutcome::NoContent)
                }
                _ => {
                    debug!("Create rejected: empty title");
                    Ok(ActionOutcome::Invalid(ActionError::bad_request(TITLE_REQUIRED)))
                }
            },
        }
    }
}
