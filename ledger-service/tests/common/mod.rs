#![allow(dead_code)]

use std::process::{Command, Stdio};
use std::{
    net::TcpListener,
    path::{Path, PathBuf},
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use ledger_service::{
    bootstrap_admins, build_router, config::ServiceConfig, database::Database, state::AppState,
};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;
use tower::ServiceExt;

pub const ISSUER_TOKEN: &str = "test-issuer";
pub const METRICS_TOKEN: &str = "test-metrics";
pub const ADMIN: &str = "admin-1";

/// Get an available ephemeral port on localhost.
pub fn find_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Resolve the ledger-service binary path from env or common target dirs.
pub fn resolve_binary_path() -> String {
    if let Some(p) = option_env!("CARGO_BIN_EXE_ledger-service") {
        return p.to_string();
    }

    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest.parent().unwrap_or(&manifest).to_path_buf();
    let candidates = [
        manifest.join("target/debug/ledger-service"),
        manifest.join("target/release/ledger-service"),
        workspace_root.join("target/debug/ledger-service"),
        workspace_root.join("target/release/ledger-service"),
    ];
    for cand in candidates.iter() {
        if Path::new(&cand).exists() {
            return cand.to_string_lossy().to_string();
        }
    }

    "ledger-service".to_string()
}

/// Poll /healthz until the server responds OK or timeout.
pub async fn wait_ready(base: &str, timeout_ms: u64) -> anyhow::Result<()> {
    let client = Client::new();
    let mut waited = 0u64;
    loop {
        if waited >= timeout_ms {
            anyhow::bail!("server not ready after {}ms", timeout_ms);
        }
        if let Ok(resp) = client.get(format!("{}/healthz", base)).send().await {
            if resp.status().is_success() {
                return Ok(());
            }
        }
        sleep(Duration::from_millis(50)).await;
        waited += 50;
    }
}

// Kills the child process on drop
pub struct ChildGuard(std::process::Child);
impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

pub async fn setup_server() -> anyhow::Result<(String, ChildGuard)> {
    let bin = resolve_binary_path();
    assert!(Path::new(&bin).exists(), "binary not found at {}", bin);

    let port = find_free_port();
    let base_url = format!("http://127.0.0.1:{}", port);

    let child = Command::new(&bin)
        .env("SESSION_ISSUER_TOKEN", ISSUER_TOKEN)
        .env("METRICS_AUTH_TOKEN", METRICS_TOKEN)
        .env("BOOTSTRAP_ADMINS", ADMIN)
        .env("DB_PATH", ":memory:")
        .env("PORT", port.to_string())
        .env("RUST_LOG", "info")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let guard = ChildGuard(child);
    wait_ready(&base_url, 10_000).await?;

    Ok((base_url, guard))
}

/// In-process app over a fresh in-memory store, with [`ADMIN`] bootstrapped.
pub async fn setup_app() -> (Router, AppState) {
    let db = Database::connect(":memory:").await.unwrap();
    bootstrap_admins(&db, &[ADMIN.to_string()]).await.unwrap();

    let mut config = ServiceConfig::new(":memory:", ISSUER_TOKEN);
    config.metrics_auth_token = Some(METRICS_TOKEN.to_string());
    let state = AppState::new(db, config);
    (build_router(state.clone()), state)
}

/// Send one request through the router. Non-JSON bodies come back as a
/// JSON string.
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
