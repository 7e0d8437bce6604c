use super::request::{parse_request, ParsedRequest};
use super::response::{write_html, write_json, write_json_error, write_no_content};
use crate::action::{ActionError, ActionHandler, ActionOutcome};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::loader::ListLoader;
use crate::store::{StoreError, TodoStore};
use crate::view::View;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span};

/// Routes requests to the loader, the action handler and the view.
///
/// | Route | Response |
/// |-------|----------|
/// | `GET /` | rendered page |
/// | `POST /` | action, then re-rendered page (400 with inline error) |
/// | `GET /todos` | `{"todos": [...]}` |
/// | `POST /todos` | 204, or 400 `{"error": ...}` |
/// | `GET /health` | `{"status": "ok"}` |
#[derive(Clone)]
pub struct AppService {
    loader: ListLoader,
    actions: ActionHandler,
    view: Arc<View>,
}

impl AppService {
    /// Wire the loader and handler to one shared store.
    pub fn new(store: Arc<dyn TodoStore>, view: View) -> Self {
        Self {
            loader: ListLoader::new(Arc::clone(&store)),
            actions: ActionHandler::new(store),
            view: Arc::new(view),
        }
    }

    fn route(&self, req: &ParsedRequest, res: &mut Response) -> u16 {
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/health") => health_endpoint(res),
            ("GET", "/") => self.page(res, 200, None),
            ("POST", "/") => self.page_action(req, res),
            ("GET", "/todos") => self.list_todos(res),
            ("POST", "/todos") => self.todo_action(req, res),
            (method, path) => {
                write_json(
                    res,
                    404,
                    &json!({"error": "Not Found", "method": method, "path": path}),
                );
                404
            }
        }
    }

    fn page(&self, res: &mut Response, status: u16, error: Option<&ActionError>) -> u16 {
        let list = match self.loader.load() {
            Ok(list) => list,
            Err(e) => return store_fault(res, &e),
        };
        match self.view.render_index(&list, error) {
            Ok(html) => {
                write_html(res, status, html);
                status
            }
            Err(e) => {
                error!(error = %e, "Template rendering failed");
                write_json_error(res, 500, "Template rendering failed");
                500
            }
        }
    }

    fn page_action(&self, req: &ParsedRequest, res: &mut Response) -> u16 {
        match self.actions.handle_form(&req.form()) {
            Ok(ActionOutcome::NoContent) => self.page(res, 200, None),
            Ok(ActionOutcome::Invalid(err)) => self.page(res, err.status, Some(&err)),
            Err(e) => store_fault(res, &e),
        }
    }

    fn list_todos(&self, res: &mut Response) -> u16 {
        match self.loader.load() {
            Ok(list) => {
                write_json(res, 200, &list);
                200
            }
            Err(e) => store_fault(res, &e),
        }
    }

    fn todo_action(&self, req: &ParsedRequest, res: &mut Response) -> u16 {
        match self.actions.handle_form(&req.form()) {
            Ok(ActionOutcome::NoContent) => {
                write_no_content(res);
                204
            }
            Ok(ActionOutcome::Invalid(err)) => {
                write_json(res, err.status, &err);
                err.status
            }
            Err(e) => store_fault(res, &e),
        }
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> u16 {
    write_json(res, 200, &json!({ "status": "ok" }));
    200
}

fn store_fault(res: &mut Response, err: &StoreError) -> u16 {
    error!(error = %err, "Store request failed");
    write_json_error(res, 500, "Store request failed");
    500
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let started = Instant::now();
        let parsed = parse_request(req);
        let request_id = RequestId::from_header_or_new(parsed.header(REQUEST_ID_HEADER));

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %parsed.method,
            path = %parsed.path,
            status = tracing::field::Empty,
        );
        let _entered = span.enter();

        let status = self.route(&parsed, res);

        span.record("status", status);
        info!(
            status,
            latency_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        Ok(())
    }
}
