//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use visionflux_relay::config::RelayConfig;
use visionflux_relay::http::HttpServer;

/// One request observed by the mock upstream.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub at: Instant,
}

impl SeenRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub type RequestLog = Arc<Mutex<Vec<SeenRequest>>>;

/// Start a mock upstream whose response depends on how many requests it has
/// already served. Returns its address and the log of observed requests.
pub async fn start_upstream<F>(respond: F) -> (SocketAddr, RequestLog)
where
    F: Fn(usize) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();
    let respond: Arc<dyn Fn(usize) -> (u16, String) + Send + Sync> = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let seen = seen.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let _ = serve_one(socket, seen, respond).await;
            });
        }
    });

    (addr, log)
}

/// Mock upstream that always answers 200 with a fixed JSON body.
#[allow(dead_code)]
pub async fn start_json_upstream(body: &'static str) -> (SocketAddr, RequestLog) {
    start_upstream(move |_| (200, body.to_string())).await
}

async fn serve_one(
    mut socket: TcpStream,
    seen: RequestLog,
    respond: Arc<dyn Fn(usize) -> (u16, String) + Send + Sync>,
) -> std::io::Result<()> {
    let request = read_request(&mut socket).await?;
    let index = {
        let mut log = seen.lock().unwrap();
        log.push(request);
        log.len() - 1
    };

    let (status, body) = respond(index);
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "OK",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

/// Read one HTTP/1.1 request off the socket: head, then as many body bytes
/// as Content-Length announces.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<SeenRequest> {
    let at = Instant::now();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            break buf.len();
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body_read = buf.len() - header_end;
    while body_read < content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body_read += n;
    }

    Ok(SeenRequest {
        method,
        path,
        headers,
        at,
    })
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
}

/// Start a relay on an ephemeral port with the given config.
pub async fn spawn_relay(config: RelayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Retry settings tuned so failure tests finish quickly.
pub fn fast_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.retries.base_delay_ms = 100;
    config.retries.max_delay_ms = 1000;
    config
}
