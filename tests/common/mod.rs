//! Shared helpers for API tests

#![allow(dead_code)]

use gatekeep::api::{serve, AppState, SharedState};
use gatekeep::config::{AuthConfig, Config, DatabaseConfig};
use gatekeep::Database;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A running server on an ephemeral port
pub struct TestServer {
    pub base_url: String,
    pub state: SharedState,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("register request failed")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed")
    }

    /// Register then log in, returning the access token
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("login body");
        body["access_token"]
            .as_str()
            .expect("access_token in login response")
            .to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Config suitable for tests: in-memory store, cheap bcrypt, fixed secret
pub fn test_config() -> Config {
    Config {
        database: DatabaseConfig::in_memory(),
        auth: AuthConfig {
            jwt_secret: Some(TEST_SECRET.to_string()),
            token_ttl_secs: 3600,
            bcrypt_cost: 4,
        },
        ..Config::default()
    }
}

pub async fn start_server() -> TestServer {
    start_server_with(test_config()).await
}

pub async fn start_server_with(config: Config) -> TestServer {
    let db = Database::open(&config.database).expect("open database");
    let state: SharedState = Arc::new(AppState::with_database(&config, db));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let server_state = state.clone();
    let handle = tokio::spawn(async move {
        let _ = serve(listener, server_state).await;
    });

    TestServer {
        base_url: format!("http://{}", addr),
        state,
        client: reqwest::Client::new(),
        handle,
    }
}
