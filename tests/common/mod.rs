//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_compression::tokio::bufread::{GzipDecoder, GzipEncoder};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use prerender_proxy::{HttpServer, ProxyConfig};

pub const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
pub const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
pub const ORIGIN_BODY: &str = "<html>origin</html>";

/// A request seen by the mock prerender service.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path_and_query: String,
    pub headers: HeaderMap,
}

/// Canned answer of the mock prerender service.
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_encoding: Option<&'static str>,
    pub body: Vec<u8>,
}

struct BackendState {
    reply: Reply,
    requests: Mutex<Vec<Recorded>>,
}

/// Mock prerender service bound on an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<BackendState>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn backend_handler(State(state): State<Arc<BackendState>>, req: Request) -> Response {
    state.requests.lock().unwrap().push(Recorded {
        path_and_query: req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        headers: req.headers().clone(),
    });

    let reply = &state.reply;
    let mut response = (reply.status, reply.body.clone()).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    if let Some(encoding) = reply.content_encoding {
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static(encoding));
    }
    response
}

/// Start a mock prerender service answering every request with `reply`.
pub async fn start_mock_backend(reply: Reply) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(BackendState {
        reply,
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .fallback(backend_handler)
        .with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    MockBackend { addr, state }
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Origin app counting how often it was reached.
pub fn origin(hits: Arc<AtomicUsize>) -> Router {
    Router::new().fallback(move || {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            (
                [(header::CONTENT_TYPE, "text/html")],
                Body::from(ORIGIN_BODY),
            )
        }
    })
}

/// Full application router pointed at `service_url`.
pub fn app(service_url: String, token: Option<&str>, hits: Arc<AtomicUsize>) -> Router {
    let mut config = ProxyConfig::default();
    config.prerender.service_url = service_url;
    config.prerender.token = token.map(str::to_string);
    HttpServer::with_origin(config, origin(hits))
        .unwrap()
        .router()
}

pub async fn gzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzipEncoder::new(data).read_to_end(&mut out).await.unwrap();
    out
}

pub async fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzipDecoder::new(data).read_to_end(&mut out).await.unwrap();
    out
}
