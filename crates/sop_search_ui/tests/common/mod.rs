//! In-process `/search` server shared by the integration tests. No mocks: the
//! controller and binary talk to it over real HTTP.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

/// Request bodies received by the server, in arrival order.
pub type Received = Arc<Mutex<Vec<Value>>>;

/// How the server answers every request.
#[derive(Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Raw(&'static str),
}

pub fn password_reset_answer() -> Value {
    json!({
        "answer": "Answer: Go to settings.",
        "sources": [{
            "title": "Password Reset SOP",
            "id": "SOP-12",
            "department": "IT",
            "relevance": 92,
            "preview": "Steps to reset..."
        }]
    })
}

async fn handler(
    State((reply, received)): State<(Reply, Received)>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    use axum::response::IntoResponse;
    received.lock().unwrap().push(body);
    match reply {
        Reply::Json(status, value) => (status, Json(value)).into_response(),
        Reply::Raw(text) => text.into_response(),
    }
}

fn router(reply: Reply, received: Received) -> Router {
    Router::new()
        .route("/search", post(handler))
        .with_state((reply, received))
}

/// Serve on an ephemeral port inside the current runtime.
pub async fn spawn_server(reply: Reply) -> (String, Received) {
    let received = Received::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(reply, received.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

/// Serve from a background thread with its own runtime, for tests that run the binary.
pub fn spawn_server_thread(reply: Reply) -> (String, Received) {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let received = Received::default();
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tx.send((format!("http://{addr}"), received.clone())).unwrap();
            axum::serve(listener, router(reply, received)).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

/// A base URL with nothing listening behind it.
pub fn dead_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    format!("http://127.0.0.1:{port}")
}
