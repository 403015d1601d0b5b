//! Shared test setup: an in-process API server over fresh in-memory state,
//! plus stub webhook receivers bound to ephemeral local ports.
#![allow(dead_code)]

use axum::{routing::post, Json, Router};
use axum_test::TestServer;
use driveflow_api::setup::routes::setup_routes;
use driveflow_api::state::AppState;
use driveflow_core::Config;
use std::sync::{Arc, Mutex};

/// Test application state
pub struct TestApp {
    pub server: TestServer,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test application with isolated in-memory stores.
/// Private webhook hosts are allowed so tests can target 127.0.0.1 stubs.
pub fn setup_test_app() -> TestApp {
    let config = Config {
        webhook_allow_private_hosts: true,
        ..Config::default()
    };

    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    let router = setup_routes(state).expect("Failed to build router");

    TestApp {
        server: TestServer::new(router).expect("Failed to start test server"),
    }
}

/// A stub webhook endpoint recording every payload it receives.
pub struct WebhookStub {
    pub url: String,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl WebhookStub {
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }
}

/// Spawn a local webhook receiver answering `status` with `response`.
pub async fn spawn_webhook_stub(status: u16, response: serde_json::Value) -> WebhookStub {
    let received = Arc::new(Mutex::new(Vec::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().unwrap();

    let sink = received.clone();
    let app = Router::new().route(
        "/hook",
        post(move |Json(body): Json<serde_json::Value>| {
            let sink = sink.clone();
            let response = response.clone();
            async move {
                sink.lock().unwrap().push(body);
                (
                    axum::http::StatusCode::from_u16(status).unwrap(),
                    Json(response),
                )
            }
        }),
    );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    WebhookStub {
        url: format!("http://{}/hook", addr),
        received,
    }
}

/// A 127.0.0.1 URL with nothing listening behind it.
pub async fn unreachable_webhook_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/hook", addr)
}
