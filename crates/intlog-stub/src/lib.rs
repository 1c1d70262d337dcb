//! Scripted stand-in for the logging service, for HTTP-level tests.
//!
//! Serves an `axum` router on a loopback port from a background runtime.
//! Each request is recorded and answered with the next canned response;
//! once the script runs out every request gets a 500.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::sync::oneshot;

/// A request as the service saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path as sent on the wire, still percent-encoded.
    pub path: String,
    /// JSON body, or `Null` when the body was empty.
    pub body: Value,
}

struct Script {
    responses: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct StubService {
    addr: SocketAddr,
    script: Arc<Script>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubService {
    /// Start serving; `responses` are `(status, json body)` pairs in the
    /// order requests are expected.
    pub fn start<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = (u16, S)>,
        S: Into<String>,
    {
        let script = Arc::new(Script {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| (status, body.into()))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(answer)
            .with_state(Arc::clone(&script));

        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub listener");
                let _ = addr_tx.send(listener.local_addr().expect("stub local addr"));
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("stub server");
            });
        });

        let addr = addr_rx.recv().expect("stub server did not start");
        Self {
            addr,
            script,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Base URL to configure the client with.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script
            .requests
            .lock()
            .expect("stub request log poisoned")
            .clone()
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn answer(
    State(script): State<Arc<Script>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    script
        .requests
        .lock()
        .expect("stub request log poisoned")
        .push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            body,
        });

    let next = script
        .responses
        .lock()
        .expect("stub script poisoned")
        .pop_front();
    let (status, body) = next.unwrap_or((500, r#"{"error": "unexpected request"}"#.to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
