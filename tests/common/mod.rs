//! Shared test utilities: a scripted in-process backend and a mock
//! graphql-transport-ws server.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use pingmon::config::EndpointConfig;
use pingmon::graphql::{ClientError, OperationOutcome, PingBackend, PingStream};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// Scripted backend
// =============================================================================

/// Backend with canned results. Mutations pop from a queue and fall back to
/// `Ok(None)` once it is empty; subscription pushes are delivered after
/// their delays and the stream then stays open.
pub struct ScriptedBackend {
    pub query: OperationOutcome,
    pub mutations: Mutex<VecDeque<OperationOutcome>>,
    pub pushes: Mutex<Option<Vec<(Duration, OperationOutcome)>>>,
    pub mutation_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(
        query: OperationOutcome,
        mutations: Vec<OperationOutcome>,
        pushes: Vec<(Duration, OperationOutcome)>,
    ) -> Self {
        Self {
            query,
            mutations: Mutex::new(mutations.into()),
            pushes: Mutex::new(Some(pushes)),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PingBackend for ScriptedBackend {
    async fn get_last_ping(&self) -> OperationOutcome {
        self.query.clone()
    }

    async fn trigger_ping(&self) -> OperationOutcome {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.mutations.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn subscribe(&self) -> Result<PingStream, ClientError> {
        let pushes = self.pushes.lock().unwrap().take().unwrap_or_default();
        Ok(Box::pin(async_stream::stream! {
            for (delay, outcome) in pushes {
                tokio::time::sleep(delay).await;
                yield outcome;
            }
            std::future::pending::<()>().await;
        }))
    }
}

// =============================================================================
// Mock graphql-transport-ws server
// =============================================================================

/// What the mock server sends after it receives `subscribe`
#[derive(Debug, Clone)]
pub enum ServerPush {
    Next(String),
    NextNull,
    Error(String),
    Complete,
    Close,
    /// Send nothing and keep the socket open
    Hold,
}

#[derive(Default)]
pub struct WsRecord {
    pub protocol: Option<String>,
    pub subscribe: Option<Value>,
}

struct WsScript {
    ack: bool,
    pushes: Vec<ServerPush>,
    record: Arc<Mutex<WsRecord>>,
}

/// Start a mock server on `/query` and return its address plus what it saw.
pub async fn spawn_ws_server(
    ack: bool,
    pushes: Vec<ServerPush>,
) -> (SocketAddr, Arc<Mutex<WsRecord>>) {
    let record = Arc::new(Mutex::new(WsRecord::default()));
    let script = Arc::new(WsScript {
        ack,
        pushes,
        record: Arc::clone(&record),
    });

    let app = Router::new()
        .route("/query", get(ws_handler))
        .with_state(script);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, record)
}

/// Plain TCP listener that accepts and immediately drops every connection,
/// so TLS handshakes against it fail.
pub async fn spawn_plain_tcp_listener() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    addr
}

/// Endpoint config pointing both transports at `addr`
pub fn endpoint_for(addr: SocketAddr) -> EndpointConfig {
    EndpointConfig {
        http_url: format!("http://{}/query", addr),
        ws_url: None,
        timeout_seconds: Some(5),
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(script): State<Arc<WsScript>>,
) -> Response {
    script.record.lock().unwrap().protocol = headers
        .get("sec-websocket-protocol")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    ws.protocols(["graphql-transport-ws"])
        .on_upgrade(move |socket| serve_socket(socket, script))
}

async fn recv_json(socket: &mut WebSocket) -> Option<Value> {
    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).ok();
        }
    }
    None
}

async fn send_json(socket: &mut WebSocket, value: Value) {
    let _ = socket.send(Message::Text(value.to_string())).await;
}

async fn serve_socket(mut socket: WebSocket, script: Arc<WsScript>) {
    match recv_json(&mut socket).await {
        Some(init) if init["type"] == "connection_init" => {}
        _ => return,
    }
    if !script.ack {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }
    send_json(&mut socket, json!({"type": "connection_ack"})).await;

    let Some(subscribe) = recv_json(&mut socket).await else {
        return;
    };
    let id = subscribe["id"].as_str().unwrap_or_default().to_string();
    script.record.lock().unwrap().subscribe = Some(subscribe);

    // Exercise keepalive handling before the first push
    send_json(&mut socket, json!({"type": "ping"})).await;

    for push in &script.pushes {
        match push {
            ServerPush::Next(ping) => {
                send_json(
                    &mut socket,
                    json!({"id": id, "type": "next", "payload": {"data": {"ping": ping}}}),
                )
                .await
            }
            ServerPush::NextNull => {
                send_json(
                    &mut socket,
                    json!({"id": id, "type": "next", "payload": {"data": {"ping": null}}}),
                )
                .await
            }
            ServerPush::Error(message) => {
                send_json(
                    &mut socket,
                    json!({"id": id, "type": "error", "payload": [{"message": message}]}),
                )
                .await
            }
            ServerPush::Complete => {
                send_json(&mut socket, json!({"id": id, "type": "complete"})).await
            }
            ServerPush::Close => {
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
            ServerPush::Hold => {
                while let Some(Ok(_)) = socket.recv().await {}
                return;
            }
        }
    }

    // Drain until the client goes away
    while let Some(Ok(_)) = socket.recv().await {}
}
