use http::StatusCode;
use may_minihttp::Response;
use serde::Serialize;
use serde_json::json;
use tracing::error;

fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

pub fn write_html(res: &mut Response, status: u16, body: String) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: text/html; charset=utf-8");
    res.body_vec(body.into_bytes());
}

pub fn write_json<T: Serialize>(res: &mut Response, status: u16, body: &T) {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            res.status_code(status as usize, status_reason(status));
            res.header("Content-Type: application/json");
            res.body_vec(bytes);
        }
        Err(e) => {
            error!(error = %e, "Response serialization failed");
            write_json_error(res, 500, "Failed to serialize response");
        }
    }
}

pub fn write_json_error(res: &mut Response, status: u16, message: &str) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(json!({ "error": message }).to_string().into_bytes());
}

pub fn write_no_content(res: &mut Response) {
    res.status_code(204, status_reason(204));
}
