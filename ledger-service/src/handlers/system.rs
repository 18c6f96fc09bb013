//! Health, build metadata and operator stats

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::metrics::snapshot_as_json;
use crate::state::AppState;
use crate::utils::tokens_match;

const METRICS_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-metrics-token");

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_meta() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": option_env!("LEDGER_BUILD_GIT_HASH").unwrap_or("unknown"),
        "build_time_unix": option_env!("LEDGER_BUILD_TIME_UNIX")
            .and_then(|t| t.parse::<u64>().ok()),
    }))
}

/// Operator counters. Hidden unless `METRICS_AUTH_TOKEN` is configured.
pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let expected = state
        .config
        .metrics_auth_token
        .as_deref()
        .ok_or(ApiError::RouteDisabled)?;

    let presented = headers
        .get(&METRICS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if !presented.is_some_and(|token| tokens_match(token, expected)) {
        warn!("Rejected /admin/stats request with bad metrics token");
        return Err(ApiError::Unauthenticated("Invalid metrics token"));
    }

    Ok(Json(snapshot_as_json(&state.config.db_path)))
}
