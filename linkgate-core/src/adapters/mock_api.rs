//! Mock Plaid and Clearbit API server for testing
//!
//! A small threaded HTTP server that answers the endpoints the adapters use,
//! with the same response and error shapes as the real services:
//! - POST /item/public_token/exchange returns { access_token, item_id, request_id }
//! - POST /transactions/get returns { transactions: [...], total_transactions: N }
//! - GET /v1/domains/find?name=... returns { name, domain, logo } or 404
//!
//! Public tokens are single-use, just like the real exchange endpoint.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

/// Mock API server for testing
pub struct MockApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Configuration for mock data generation
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Number of transactions the linked item has
    pub num_transactions: usize,
    /// Answer transaction listings with ITEM_LOGIN_REQUIRED
    pub item_error: bool,
    /// Answer every Plaid call with a 500 API_ERROR
    pub api_error: bool,
    /// Company names the enrichment endpoint knows about
    pub known_companies: Vec<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            num_transactions: 50,
            item_error: false,
            api_error: false,
            known_companies: vec!["Segment".to_string(), "Stripe".to_string()],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PlaidRequest {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    secret: String,
    #[serde(default)]
    public_token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    options: Option<PlaidOptions>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaidOptions {
    #[serde(default)]
    count: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

/// Raw request as read off the socket
struct RawRequest {
    method: String,
    path: String,
    headers: String,
    body: Vec<u8>,
}

/// Response: status, reason, JSON body
type MockResponse = (u16, &'static str, String);

impl MockApiServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let consumed_tokens = Arc::new(Mutex::new(HashSet::new()));

        // Non-blocking accept so stop() can end the loop
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let consumed = consumed_tokens.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &consumed);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the port the server is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, consumed: &Mutex<HashSet<String>>) {
    // Accepted sockets inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);

    let Some(request) = read_request(&mut stream) else {
        send_response(&mut stream, (400, "Bad Request", r#"{"error":"Invalid request"}"#.to_string()));
        return;
    };

    let (path, query) = match request.path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (request.path.as_str(), ""),
    };

    let response = match (request.method.as_str(), path) {
        ("POST", "/item/public_token/exchange") => {
            with_plaid_request(&request, config, |body| exchange(body, consumed))
        }
        ("POST", "/transactions/get") => {
            with_plaid_request(&request, config, |body| transactions(body, config))
        }
        ("GET", "/v1/domains/find") => find_company(&request, query, config),
        _ => (404, "Not Found", r#"{"error":"Endpoint not found"}"#.to_string()),
    };

    send_response(&mut stream, response);
}

/// Read the request line, headers and a Content-Length body
fn read_request(stream: &mut TcpStream) -> Option<RawRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    let mut lines = head.lines();
    let mut parts = lines.next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();
    let headers = lines.collect::<Vec<_>>().join("\n");
    let end = buffer.len().min(body_start + content_length);

    Some(RawRequest {
        method,
        path,
        headers,
        body: buffer[body_start..end].to_vec(),
    })
}

fn send_response(stream: &mut TcpStream, (status, status_text, body): MockResponse) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn plaid_error(status: u16, error_type: &str, error_code: &str, message: &str) -> MockResponse {
    let status_text = if status == 500 { "Internal Server Error" } else { "Bad Request" };
    let body = json!({
        "display_message": null,
        "error_type": error_type,
        "error_code": error_code,
        "error_message": message,
        "request_id": "mock-request",
    });
    (status, status_text, body.to_string())
}

/// Decode the body and check client credentials before running a handler
fn with_plaid_request(
    request: &RawRequest,
    config: &MockConfig,
    handler: impl FnOnce(PlaidRequest) -> MockResponse,
) -> MockResponse {
    if config.api_error {
        return plaid_error(500, "API_ERROR", "INTERNAL_SERVER_ERROR", "an unexpected error occurred");
    }

    let body: PlaidRequest = match serde_json::from_slice(&request.body) {
        Ok(body) => body,
        Err(_) => {
            return plaid_error(400, "INVALID_REQUEST", "INVALID_BODY", "body could not be parsed as JSON")
        }
    };

    if body.client_id.is_empty() || body.secret.is_empty() {
        return plaid_error(
            400,
            "INVALID_INPUT",
            "INVALID_API_KEYS",
            "invalid client_id or secret provided",
        );
    }

    handler(body)
}

fn exchange(body: PlaidRequest, consumed: &Mutex<HashSet<String>>) -> MockResponse {
    let token = body.public_token.unwrap_or_default();

    let Some(identifier) = token.strip_prefix("public-") else {
        return plaid_error(
            400,
            "INVALID_INPUT",
            "INVALID_PUBLIC_TOKEN",
            "provided public token is in an invalid format. expected format: public-<environment>-<identifier>",
        );
    };

    let first_use = consumed
        .lock()
        .map(|mut tokens| tokens.insert(token.clone()))
        .unwrap_or(false);
    if !first_use {
        return plaid_error(
            400,
            "INVALID_INPUT",
            "INVALID_PUBLIC_TOKEN",
            "provided public token is expired. Public tokens expire 30 minutes after creation at which point they can no longer be exchanged",
        );
    }

    let body = json!({
        "access_token": format!("access-{}", identifier),
        "item_id": format!("item-{}", identifier),
        "request_id": "mock-request",
    });
    (200, "OK", body.to_string())
}

fn transactions(body: PlaidRequest, config: &MockConfig) -> MockResponse {
    let access_token = body.access_token.unwrap_or_default();
    if !access_token.starts_with("access-") {
        return plaid_error(
            400,
            "INVALID_INPUT",
            "INVALID_ACCESS_TOKEN",
            "provided access token is in an invalid format. expected format: access-<environment>-<identifier>",
        );
    }

    if config.item_error {
        return plaid_error(
            400,
            "ITEM_ERROR",
            "ITEM_LOGIN_REQUIRED",
            "the login details of this item have changed (credentials, MFA, or required user action) and a user login is required to update this information",
        );
    }

    let options = body.options.unwrap_or_default();
    let count = options.count.unwrap_or(100);
    let offset = options.offset.unwrap_or(0);

    if !(1..=500).contains(&count) {
        return plaid_error(
            400,
            "INVALID_REQUEST",
            "INVALID_FIELD",
            "count must be a number between 1 and 500",
        );
    }
    if offset < 0 {
        return plaid_error(
            400,
            "INVALID_REQUEST",
            "INVALID_FIELD",
            "offset must be a non-negative number",
        );
    }

    let all = generate_mock_transactions(config.num_transactions);
    let page: Vec<JsonValue> = all
        .iter()
        .skip(offset as usize)
        .take(count as usize)
        .cloned()
        .collect();

    let body = json!({
        "accounts": [],
        "item": { "item_id": "item-mock" },
        "total_transactions": all.len(),
        "transactions": page,
        "request_id": "mock-request",
    });
    (200, "OK", body.to_string())
}

fn find_company(request: &RawRequest, query: &str, config: &MockConfig) -> MockResponse {
    let authorized = request
        .headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .any(|(name, value)| {
            name.trim().eq_ignore_ascii_case("authorization")
                && value.trim().len() > "Bearer ".len()
        });
    if !authorized {
        return (401, "Unauthorized", r#"{"error":{"type":"auth_required"}}"#.to_string());
    }

    let name = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "name")
        .map(|(_, value)| value.replace("%20", " ").replace('+', " "))
        .unwrap_or_default();

    match config
        .known_companies
        .iter()
        .find(|known| known.eq_ignore_ascii_case(&name))
    {
        Some(known) => {
            let domain = format!("{}.com", known.to_lowercase());
            let body = json!({
                "name": known,
                "domain": domain,
                "logo": format!("https://logo.clearbit.com/{}", domain),
            });
            (200, "OK", body.to_string())
        }
        None => (
            404,
            "Not Found",
            r#"{"error":{"type":"not_found","message":"Company not found"}}"#.to_string(),
        ),
    }
}

fn generate_mock_transactions(count: usize) -> Vec<JsonValue> {
    let merchants = [
        ("Starbucks", 4.33),
        ("Uber", 6.33),
        ("United Airlines", 500.0),
        ("McDonald's", 12.0),
        ("Touchstone Climbing", 78.5),
        ("SparkFun", 89.4),
        ("KFC", 500.0),
        ("Madison Bicycle Shop", 500.0),
        ("CD DEPOSIT .INITIAL.", 1000.0),
        ("INTRST PYMNT", -4.22),
    ];

    let today = Utc::now().naive_utc().date();

    (0..count)
        .map(|i| {
            let (merchant, amount) = merchants[i % merchants.len()];
            let date = today - Duration::days((i % 30) as i64);

            json!({
                "transaction_id": format!("tx_{:04}", i),
                "account_id": "acc_checking",
                "amount": amount,
                "iso_currency_code": "USD",
                "date": date.format("%Y-%m-%d").to_string(),
                "name": merchant,
                "pending": false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_starts() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        assert!(server.port() > 0);
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
    }

    #[test]
    fn test_generated_transactions_are_deterministic() {
        let a = generate_mock_transactions(12);
        let b = generate_mock_transactions(12);
        assert_eq!(a, b);
        assert_eq!(a[11]["transaction_id"], "tx_0011");
    }

    #[test]
    fn test_exchange_consumes_token() {
        let consumed = Mutex::new(HashSet::new());
        let request = || PlaidRequest {
            client_id: "c".to_string(),
            secret: "s".to_string(),
            public_token: Some("public-sandbox-1".to_string()),
            ..Default::default()
        };

        assert_eq!(exchange(request(), &consumed).0, 200);
        assert_eq!(exchange(request(), &consumed).0, 400);
    }
}
