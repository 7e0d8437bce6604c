#![allow(dead_code)]

pub mod test_server {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}

pub mod fake_store {
    use std::sync::Mutex;
    use yarukoto::store::{StoreError, TodoStore};
    use yarukoto::todo::{NewTodo, TodoId, TodoRow};

    /// One recorded store operation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        SelectAll,
        Insert(NewTodo),
        Delete(TodoId),
    }

    /// Store fake that records every call and answers `select_all` with a
    /// fixed result.
    pub struct RecordingStore {
        calls: Mutex<Vec<Call>>,
        rows: Option<Vec<TodoRow>>,
        fail: bool,
    }

    impl RecordingStore {
        /// `select_all` returns `None`, mutations succeed.
        pub fn empty() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                rows: None,
                fail: false,
            }
        }

        pub fn with_rows(rows: Vec<TodoRow>) -> Self {
            Self {
                rows: Some(rows),
                ..Self::empty()
            }
        }

        /// Every operation fails with a transport error.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::empty()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(StoreError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    impl TodoStore for RecordingStore {
        fn select_all(&self) -> Result<Option<Vec<TodoRow>>, StoreError> {
            self.record(Call::SelectAll)?;
            Ok(self.rows.clone())
        }

        fn insert(&self, todo: &NewTodo) -> Result<(), StoreError> {
            self.record(Call::Insert(todo.clone()))
        }

        fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
            self.record(Call::Delete(id.clone()))
        }
    }

    pub fn row(id: u64, title: &str, done: bool) -> TodoRow {
        TodoRow {
            id: TodoId::from(id),
            title: title.to_string(),
            done,
            created_at: None,
        }
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::Arc;
    use std::time::Duration;
    use yarukoto::server::{AppService, HttpServer, ServerHandle};
    use yarukoto::store::TodoStore;
    use yarukoto::view::View;

    /// Start the service on a free local port.
    pub fn start_service(store: Arc<dyn TodoStore>) -> ServerHandle {
        super::test_server::setup_may_runtime();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = AppService::new(store, View::new().unwrap());
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        handle
    }

    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {e:?}"),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    pub fn get(addr: &SocketAddr, path: &str) -> String {
        send_request(
            addr,
            &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        )
    }

    pub fn post_form(addr: &SocketAddr, path: &str, body: &str) -> String {
        send_request(
            addr,
            &format!(
                "POST {path} HTTP/1.1\r\nHost: localhost\r\n\
                 Content-Type: application/x-www-form-urlencoded\r\n\
                 Content-Length: {}\r\n\r\n{body}",
                body.len()
            ),
        )
    }

    /// Split a raw response into status code, header block and body.
    pub fn parse_response(resp: &str) -> (u16, String, String) {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let status = head
            .lines()
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        (status, head.to_string(), body.to_string())
    }

    pub fn parse_json(resp: &str) -> (u16, serde_json::Value) {
        let (status, _, body) = parse_response(resp);
        (status, serde_json::from_str(&body).unwrap_or_default())
    }
}
