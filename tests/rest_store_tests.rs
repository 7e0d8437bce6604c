//! REST store request shapes against a mock PostgREST endpoint
//!
//! A tiny_http server stands in for `{url}/rest/v1/todo`, captures each
//! request and answers with a canned status and body.

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use yarukoto::otel::RedactionLevel;
use yarukoto::store::{RestStore, RestStoreConfig, StoreError, TodoStore};
use yarukoto::todo::{NewTodo, TodoId};

const KEY: &str = "test-anon-key";

#[derive(Debug)]
struct Captured {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve `responses` in order, one per request, then stop.
fn mock_postgrest(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Captured>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let mut req = match server.recv_timeout(Duration::from_secs(5)) {
                Ok(Some(req)) => req,
                _ => return,
            };
            let mut req_body = String::new();
            req.as_reader().read_to_string(&mut req_body).unwrap();
            let captured = Captured {
                method: req.method().to_string(),
                url: req.url().to_string(),
                headers: req
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
                body: req_body,
            };
            tx.send(captured).unwrap();
            let header =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .unwrap();
            let resp = tiny_http::Response::from_string(body)
                .with_status_code(status)
                .with_header(header);
            req.respond(resp).unwrap();
        }
    });

    (format!("http://{addr}"), rx)
}

fn store_for(url: &str) -> RestStore {
    RestStore::new(RestStoreConfig {
        url: url.to_string(),
        key: KEY.to_string(),
        table: "todo".to_string(),
        timeout: Duration::from_secs(2),
        redact: RedactionLevel::default(),
    })
    .unwrap()
}

#[test]
fn test_select_all_reads_table_with_credentials() {
    let (url, rx) = mock_postgrest(vec![(
        200,
        r#"[{"id":1,"title":"Buy milk","done":false,"created_at":"2024-05-01T10:00:00+00:00"},
            {"id":2,"title":"Wash car","done":true}]"#,
    )]);
    let store = store_for(&url);

    let rows = store.select_all().unwrap().unwrap();
    let req = rx.recv().unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.url, "/rest/v1/todo?select=*");
    assert_eq!(req.header("apikey"), Some(KEY));
    assert_eq!(req.header("authorization"), Some("Bearer test-anon-key"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, TodoId::new("1"));
    assert_eq!(rows[1].title, "Wash car");
    assert!(rows[1].done);
}

#[test]
fn test_select_all_null_body_is_no_data() {
    let (url, _rx) = mock_postgrest(vec![(200, "null")]);
    assert_eq!(store_for(&url).select_all().unwrap(), None);
}

#[test]
fn test_insert_posts_title_and_done_false() {
    let (url, rx) = mock_postgrest(vec![(201, "")]);

    store_for(&url).insert(&NewTodo::titled("Buy milk")).unwrap();
    let req = rx.recv().unwrap();

    assert_eq!(req.method, "POST");
    assert_eq!(req.url, "/rest/v1/todo");
    assert_eq!(req.header("prefer"), Some("return=minimal"));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body, serde_json::json!({"title": "Buy milk", "done": false}));
}

#[test]
fn test_delete_filters_on_id() {
    let (url, rx) = mock_postgrest(vec![(204, "")]);

    store_for(&url).delete(&TodoId::new("42")).unwrap();
    let req = rx.recv().unwrap();

    assert_eq!(req.method, "DELETE");
    assert_eq!(req.url, "/rest/v1/todo?id=eq.42");
}

#[test]
fn test_error_status_is_reported() {
    let (url, _rx) = mock_postgrest(vec![(
        401,
        r#"{"message":"Invalid API key"}"#,
    )]);

    let err = store_for(&url).select_all().unwrap_err();

    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn test_malformed_rows_are_a_decode_error() {
    let (url, _rx) = mock_postgrest(vec![(200, r#"[{"title": 5}]"#)]);
    let err = store_for(&url).select_all().unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[test]
fn test_unreachable_store_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = store_for(&format!("http://{addr}")).select_all().unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}
