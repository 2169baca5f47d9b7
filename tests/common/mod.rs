//! Shared mock services for integration testing.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const COMMENTS_PATH: &str = "/api/comments";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGIN_EMAIL: &str = "probe@example.com";
pub const LOGIN_PASSWORD: &str = "probe-password";
pub const ISSUED_TOKEN: &str = "4f0c2a7e-token";

/// Observations made by the mock comment service.
#[derive(Default)]
pub struct ServiceLog {
    accepted: Mutex<u32>,
    request_ids: Mutex<HashSet<String>>,
    bodies: Mutex<Vec<Value>>,
}

impl ServiceLog {
    pub fn accepted(&self) -> u32 {
        *self.accepted.lock().unwrap()
    }

    pub fn distinct_request_ids(&self) -> usize {
        self.request_ids.lock().unwrap().len()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

struct CommentState {
    quota: u32,
    required_auth: Option<String>,
    log: Arc<ServiceLog>,
}

/// Bind an ephemeral port and serve `app` in the background.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Comment endpoint with a fixed-window quota, plus a login endpoint.
///
/// The first `quota` authorized comments (in server arrival order) get 200,
/// the rest 429. When `required_auth` is set, any other `Authorization`
/// value gets 401.
pub async fn start_comment_service(quota: u32, required_auth: Option<String>) -> (SocketAddr, Arc<ServiceLog>) {
    let log = Arc::new(ServiceLog::default());
    let state = Arc::new(CommentState {
        quota,
        required_auth,
        log: log.clone(),
    });

    let app = Router::new()
        .route(COMMENTS_PATH, post(create_comment))
        .route(LOGIN_PATH, post(login))
        .with_state(state);

    (spawn(app).await, log)
}

async fn create_comment(
    State(state): State<Arc<CommentState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        state.log.request_ids.lock().unwrap().insert(id.to_string());
    }
    state.log.bodies.lock().unwrap().push(body.clone());

    if let Some(expected) = &state.required_auth {
        let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return (StatusCode::UNAUTHORIZED, "Unauthorized".into());
        }
    }

    let mut accepted = state.log.accepted.lock().unwrap();
    if *accepted >= state.quota {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            format!("Maximum {} comments per hour", state.quota),
        );
    }
    *accepted += 1;
    (StatusCode::OK, json!({ "id": *accepted, "text": body["text"] }).to_string())
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == LOGIN_EMAIL && body["password"] == LOGIN_PASSWORD {
        (StatusCode::OK, Json(json!({ "token": ISSUED_TOKEN })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })))
    }
}

/// A service that answers every request with the same status and body.
pub async fn start_fixed_status_service(status: u16, body: impl Into<String>) -> SocketAddr {
    let status = StatusCode::from_u16(status).unwrap();
    let body: String = body.into();
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, body) }
    });
    spawn(app).await
}

/// An address nothing is listening on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
