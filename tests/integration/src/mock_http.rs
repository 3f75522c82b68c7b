//! Local REST API double
//!
//! An axum server on an ephemeral port that answers from a table of canned
//! responses and records every request it sees.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One request as the server received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockHttpState {
    responses: Mutex<HashMap<(Method, String), (StatusCode, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running mock API
#[derive(Clone)]
pub struct MockHttp {
    base: String,
    state: Arc<MockHttpState>,
}

impl MockHttp {
    /// Bind to a random local port and serve in the background
    pub async fn start() -> Result<Self> {
        let state = Arc::new(MockHttpState::default());
        let router = Router::new().fallback(respond).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base: format!("http://{addr}/api"),
            state,
        })
    }

    /// API base URL to hand to `RestClient::new`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Answer `method path` (path below the API base) with `body`
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.state
            .responses
            .lock()
            .insert((method, format!("/api{path}")), (status, body));
    }

    /// Everything received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests received for one path below the API base
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.path == full)
            .collect()
    }
}

async fn respond(
    State(state): State<Arc<MockHttpState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).ok(),
    });

    let canned = state.responses.lock().get(&(method, path)).cloned();
    match canned {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "404: Not Found"})),
        )
            .into_response(),
    }
}
