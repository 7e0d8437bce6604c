use crate::action::FormFields;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Raw request body
    pub body: Vec<u8>,
}

impl ParsedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Decode the body as `application/x-www-form-urlencoded`.
    pub fn form(&self) -> FormFields {
        FormFields::parse(&self.body)
    }
}

/// Parse an incoming HTTP request into a [`ParsedRequest`].
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let path = req.path().split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();
    debug!(header_count = headers.len(), "Headers extracted");

    let mut body = Vec::new();
    if let Err(e) = req.body().read_to_end(&mut body) {
        debug!(error = %e, "Request body could not be read");
        body.clear();
    }
    if !body.is_empty() {
        info!(
            content_length = body.len(),
            content_type = %headers.get("content-type").map(String::as_str).unwrap_or(""),
            "Request body read"
        );
    }

    ParsedRequest {
        method,
        path,
        headers,
        body,
    }
}
