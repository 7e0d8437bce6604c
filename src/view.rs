//! HTML rendering of the todo page with minijinja.
//!
//! The template is compiled into the binary; `.html` names get HTML
//! auto-escaping, so titles are safe to render as-is.

use crate::action::ActionError;
use crate::todo::TodoList;
use minijinja::{context, Environment};

const INDEX_NAME: &str = "index.html";
const INDEX_SOURCE: &str = include_str!("../templates/index.html");

/// Page heading and document title.
pub const PAGE_TITLE: &str = "Todo list";

/// Compiled page templates. Cheap to clone.
#[derive(Clone)]
pub struct View {
    env: Environment<'static>,
}

impl View {
    /// Compile the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns a minijinja error if a template fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_NAME, INDEX_SOURCE)?;
        Ok(Self { env })
    }

    /// Render the list page, with `error` shown above the creation form.
    ///
    /// # Errors
    ///
    /// Returns a minijinja error if rendering fails.
    pub fn render_index(
        &self,
        list: &TodoList,
        error: Option<&ActionError>,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(INDEX_NAME)?;
        tmpl.render(context! {
            title => PAGE_TITLE,
            todos => &list.todos,
            error => error.map(|e| e.message.as_str()),
        })
    }
}
