#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use invoice_api_rust::auth::ClaimSet;
use invoice_api_rust::config::AppConfig;
use invoice_api_rust::database::MemoryInvoiceStore;
use invoice_api_rust::{app, testing, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: MemoryInvoiceStore,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the full router over a fresh in-memory store on a free port.
pub async fn spawn_server(store: MemoryInvoiceStore) -> Result<TestServer> {
    spawn_server_with(store, AppConfig::for_tests(SECRET)).await
}

pub async fn spawn_server_with(store: MemoryInvoiceStore, config: AppConfig) -> Result<TestServer> {
    init_tracing();

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    let state = AppState::new(config, store.clone())?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(TestServer { port, base_url, store })
}

pub fn bearer(claims: &ClaimSet) -> String {
    testing::bearer(SECRET, claims).expect("token generation")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client")
}

pub fn is_canonical_uuid(value: &str) -> bool {
    uuid::Uuid::parse_str(value)
        .map(|u| u.hyphenated().to_string() == value.to_ascii_lowercase())
        .unwrap_or(false)
}

// optional, but keeps output tidy in tests
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
