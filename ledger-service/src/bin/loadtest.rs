//! Duplicate-vote race against a running service.
//!
//! Fires CONCURRENCY identical votes from one voter at one event and checks
//! that exactly one of them lands.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Barrier;

async fn issue_session(
    client: &Client,
    base_url: &str,
    issuer_token: &str,
    user_id: &str,
) -> anyhow::Result<String> {
    let resp: Value = client
        .post(format!("{}/auth/session", base_url))
        .bearer_auth(issuer_token)
        .json(&json!({ "user_id": user_id }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    resp["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("session response without token: {}", resp))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let issuer_token = std::env::var("SESSION_ISSUER_TOKEN")
        .map_err(|_| anyhow::anyhow!("SESSION_ISSUER_TOKEN env is required"))?;
    let admin_user = std::env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let voter_user = std::env::var("VOTER_USER")
        .unwrap_or_else(|_| format!("loadtest-voter-{}", Utc::now().timestamp_millis()));
    let concurrency: usize = std::env::var("CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(64);

    println!("BASE_URL={}", base_url);
    println!("ADMIN_USER={} VOTER_USER={}", admin_user, voter_user);
    println!("CONCURRENCY={}", concurrency);

    let client = Client::builder()
        .pool_max_idle_per_host(concurrency)
        .tcp_nodelay(true)
        .timeout(Duration::from_secs(15))
        .build()?;

    let admin_token = issue_session(&client, &base_url, &issuer_token, &admin_user).await?;

    client
        .post(format!("{}/admin", base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "action": "grant-role", "userId": voter_user, "role": "voter" }))
        .send()
        .await?
        .error_for_status()?;

    let now = Utc::now();
    let created: Value = client
        .post(format!("{}/voting", base_url))
        .bearer_auth(&admin_token)
        .json(&json!({
            "action": "create",
            "title": "Load test ballot",
            "options": ["Yes", "No"],
            "start_time": now - chrono::Duration::minutes(1),
            "end_time": now + chrono::Duration::hours(1),
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let event_id = created["event"]["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("create response without event id: {}", created))?;
    println!("Created event {}", event_id);

    let voter_token = issue_session(&client, &base_url, &issuer_token, &voter_user).await?;

    let barrier = Arc::new(Barrier::new(concurrency));
    let started = Instant::now();
    let mut tasks = Vec::with_capacity(concurrency);
    for _ in 0..concurrency {
        let client = client.clone();
        let url = format!("{}/voting", base_url);
        let token = voter_token.clone();
        let body = json!({ "action": "vote", "voting_event_id": event_id, "vote_option": "Yes" });
        let barrier = barrier.clone();
        tasks.push(tokio::spawn(async move {
            barrier.wait().await;
            let sent = Instant::now();
            let resp = client.post(url).bearer_auth(token).json(&body).send().await;
            (resp.map(|r| r.status()), sent.elapsed().as_millis())
        }));
    }

    let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
    let mut latencies_ms: Vec<u128> = Vec::with_capacity(concurrency);
    for task in tasks {
        let (status, ms) = task.await?;
        latencies_ms.push(ms);
        let label = match status {
            Ok(status) => status.as_u16().to_string(),
            Err(e) => {
                eprintln!("net err {}ms {}", ms, e);
                "network".to_string()
            }
        };
        *by_status.entry(label).or_insert(0) += 1;
    }

    latencies_ms.sort_unstable();
    let p = |q: f64| -> u128 {
        if latencies_ms.is_empty() {
            return 0;
        }
        let idx = ((latencies_ms.len() as f64 - 1.0) * q).round() as usize;
        latencies_ms[idx]
    };
    println!(
        "Summary: sent={} elapsed={}ms p50={}ms p90={}ms p99={}ms",
        concurrency,
        started.elapsed().as_millis(),
        p(0.50),
        p(0.90),
        p(0.99)
    );
    for (status, count) in &by_status {
        println!("  status {}: {}", status, count);
    }

    let accepted = by_status
        .get(StatusCode::OK.as_str())
        .copied()
        .unwrap_or(0);
    let detail: Value = client
        .get(format!("{}/voting/{}", base_url, event_id))
        .bearer_auth(&voter_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let total_votes = detail["event"]["total_votes"].as_u64().unwrap_or(0);
    println!("accepted={} total_votes={}", accepted, total_votes);

    if accepted != 1 || total_votes != 1 {
        anyhow::bail!(
            "expected exactly one accepted vote, got accepted={} total_votes={}",
            accepted,
            total_votes
        );
    }
    Ok(())
}
