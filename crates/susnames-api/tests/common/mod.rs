//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use http_body_util::BodyExt;
use serde_json::Value;
use susnames_api::config::{CookiePolicy, ServerConfig};
use susnames_api::render::JsonRenderer;
use susnames_api::state::AppState;
use susnames_core::rng::StdRandom;
use susnames_room::{RoomRegistry, RoomServices, RoomSettings};
use susnames_test_support::FixedClock;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tower::ServiceExt;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// App state with JSON rendering, a seeded RNG and a fixed clock.
pub fn test_state() -> AppState {
    test_state_with(RoomSettings::default())
}

/// Like [`test_state`], but new rooms get `room` settings.
pub fn test_state_with(room: RoomSettings) -> AppState {
    let config = ServerConfig {
        cookies: CookiePolicy {
            secure: false,
            http_only: true,
        },
        room,
        ..ServerConfig::default()
    };
    let services = RoomServices::new(
        Arc::new(JsonRenderer),
        StdRandom::seeded(7),
        Arc::new(FixedClock::standard()),
    );
    AppState::new(Arc::new(RoomRegistry::new(services)), config)
}

/// Build the full app router, sharing `state` with the caller.
pub fn build_test_app(state: AppState) -> Router {
    susnames_api::app(state)
}

/// Create a room directly through the registry and return its name.
pub fn create_room(state: &AppState) -> String {
    state
        .registry
        .create_room(state.config.room)
        .unwrap()
        .name()
        .to_string()
}

/// Send a request and return the status, `Set-Cookie` values and JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cookies = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, cookies, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, _, json) = send(app, request).await;
    (status, json)
}

/// Send a POST request with an optional JSON body and cookie header.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: Option<&Value>,
    cookie: Option<&str>,
) -> (StatusCode, Vec<String>, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send(app, request).await
}

/// Serve the app on an ephemeral local port.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_test_app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Open a WebSocket to `room`, presenting `cookie` if given. Returns the
/// socket and the `Set-Cookie` values of the upgrade response.
pub async fn connect_ws(
    addr: SocketAddr,
    room: &str,
    cookie: Option<&str>,
) -> Result<(WsStream, Vec<String>), tokio_tungstenite::tungstenite::Error> {
    let mut request = format!("ws://{addr}/rooms/{room}/conn")
        .into_client_request()
        .unwrap();
    if let Some(cookie) = cookie {
        request
            .headers_mut()
            .insert("cookie", HeaderValue::from_str(cookie).unwrap());
    }

    let (ws, response) = tokio_tungstenite::connect_async(request).await?;
    let cookies = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    Ok((ws, cookies))
}

/// Next frame from the server, or `None` once the socket is closed.
pub async fn next_frame(ws: &mut WsStream) -> Option<Message> {
    match timeout(TIMEOUT, ws.next()).await.expect("timeout waiting for frame") {
        Some(Ok(message)) => Some(message),
        Some(Err(_)) | None => None,
    }
}

/// Read text frames until one of type `kind` arrives.
pub async fn read_until(ws: &mut WsStream, kind: &str) -> Value {
    loop {
        match next_frame(ws).await {
            Some(Message::Text(text)) => {
                let json: Value = serde_json::from_str(&text).unwrap();
                if json["type"] == kind {
                    return json;
                }
            }
            Some(_) => {}
            None => panic!("socket closed while waiting for {kind}"),
        }
    }
}
