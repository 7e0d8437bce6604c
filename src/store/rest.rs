use super::{StoreError, TodoStore};
use crate::otel::{RedactionLevel, Redactor};
use crate::todo::{NewTodo, TodoId, TodoRow};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Connection settings for a PostgREST-compatible table endpoint.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Anon or service key sent as `apikey` and bearer token
    pub key: String,
    /// Table name (default `todo`)
    pub table: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// How the key appears in logs
    pub redact: RedactionLevel,
}

impl RestStoreConfig {
    /// The key as it may appear in a log line.
    pub fn logged_key(&self) -> String {
        Redactor::new(self.redact).redact_value("apikey", &self.key)
    }
}

/// Todo table served by PostgREST (`{url}/rest/v1/{table}`).
///
/// Blocking client: every call happens inside a may coroutine handling one
/// HTTP request, and the handler waits on exactly one store call.
pub struct RestStore {
    client: Client,
    endpoint: Url,
    key: String,
}

impl RestStore {
    /// Build the client and resolve the table endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: RestStoreConfig) -> Result<Self, StoreError> {
        let endpoint = table_endpoint(&config.url, &config.table)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(
            endpoint = %endpoint,
            apikey = %config.logged_key(),
            timeout_ms = config.timeout.as_millis() as u64,
            "REST store configured"
        );

        Ok(Self {
            client,
            endpoint,
            key: config.key,
        })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

/// `https://host` + `todo` → `https://host/rest/v1/todo`
fn table_endpoint(base: &str, table: &str) -> Result<Url, StoreError> {
    let raw = format!("{}/rest/v1/{}", base.trim_end_matches('/'), table);
    Url::parse(&raw).map_err(|e| StoreError::Unavailable(format!("invalid store url {raw}: {e}")))
}

fn ensure_success(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "Store rejected request");
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

impl TodoStore for RestStore {
    fn select_all(&self) -> Result<Option<Vec<TodoRow>>, StoreError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("select", "*");

        let resp = ensure_success(self.authorized(self.client.get(url)).send()?)?;
        let body = resp.text()?;
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let rows: Option<Vec<TodoRow>> =
            serde_json::from_str(trimmed).map_err(|e| StoreError::Decode(e.to_string()))?;
        debug!(rows = rows.as_ref().map(Vec::len), "Rows fetched");
        Ok(rows)
    }

    fn insert(&self, todo: &NewTodo) -> Result<(), StoreError> {
        let req = self
            .authorized(self.client.post(self.endpoint.clone()))
            .header("Prefer", "return=minimal")
            .json(todo);
        ensure_success(req.send()?)?;
        debug!(title = %todo.title, "Row inserted");
        Ok(())
    }

    fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"));
        ensure_success(self.authorized(self.client.delete(url)).send()?)?;
        debug!(id = %id, "Row delete issued");
        Ok(())
    }
}
