//! Common test utilities for integration tests

use ofd_ya::config::ClientConfig;
use serde_json::Value;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server};

/// A request received by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub token: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Local stand-in for the OFD-Ya API.
///
/// Every request is answered by `handler` with a status code and a JSON body,
/// and recorded for later assertions.
pub struct MockUpstream {
    pub base_url: String,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let base_url = format!("http://{addr}");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let thread_server = Arc::clone(&server);
        let thread_requests = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for mut request in thread_server.incoming_requests() {
                let mut raw = String::new();
                let _ = request.as_reader().read_to_string(&mut raw);
                let header = |name: &'static str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv(name))
                        .map(|h| h.value.as_str().to_string())
                };
                let recorded = RecordedRequest {
                    path: request.url().to_string(),
                    token: header("Ofdapitoken"),
                    content_type: header("Content-Type"),
                    body: serde_json::from_str(&raw).unwrap_or(Value::Null),
                };

                let (status, body) = handler(&recorded);
                thread_requests.lock().unwrap().push(recorded);

                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            server,
            handle: Some(handle),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Client configuration pointed at this server, rendering times in UTC.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
            utc_offset: Some("+00:00".to_string()),
            ..ClientConfig::default()
        }
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn ok(body: Value) -> (u16, String) {
    (200, body.to_string())
}

/// Register listing with one register per id.
pub fn registers_body(ids: &[&str]) -> Value {
    let mut registers = serde_json::Map::new();
    for id in ids {
        registers.insert(
            (*id).to_string(),
            serde_json::json!([{
                "address": format!("Store {id}"),
                "last": "2023-11-14",
                "kktregid": "not-the-id",
                "turnover": 0,
                "receiptCount": 1
            }]),
        );
    }
    serde_json::json!({ "KKT": registers, "count": ids.len() })
}

/// Document listing where each document only carries identifiers and a total.
pub fn documents_body(fiscal_drive_number: &str, fds: &[i64]) -> Value {
    let items: Vec<Value> = fds
        .iter()
        .map(|fd| {
            serde_json::json!({
                "dateTime": 1_700_000_000,
                "fiscalDriveNumber": fiscal_drive_number,
                "fiscalDocumentNumber": fd,
                "fiscalSign": fd * 10,
                "totalSum": 100,
                "items": []
            })
        })
        .collect();
    serde_json::json!({ "count": items.len(), "items": items })
}
