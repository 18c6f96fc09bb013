//! HTTP service for civic voting events and petitions, backed by SQLite.

pub mod auth_middleware;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;
pub mod types;
pub mod utils;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use civic_ledger::Role;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use auth_middleware::require_session;
use database::{roles, Database};
use handlers::{admin, auth, ledger_status, petition, system, templates, voting};
use state::AppState;

/// Build the full router. Rate limiting is layered on by the binary.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-metrics-token"),
        ]);

    let protected = Router::new()
        .route("/voting", get(voting::list_events).post(voting::post_voting))
        .route("/voting/{id}", get(voting::get_event))
        .route(
            "/petition",
            get(petition::list_petitions).post(petition::post_petition),
        )
        .route("/petition/{id}", get(petition::get_petition))
        .route("/admin", post(admin::post_admin))
        .route(
            "/templates",
            get(templates::list_templates).post(templates::post_templates),
        )
        .route("/templates/deployments", get(templates::list_deployments))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/healthz", get(system::health_check))
        .route("/meta", get(system::get_meta))
        .route("/admin/stats", get(system::get_stats))
        .route("/ledger/status", get(ledger_status::get_ledger_status))
        .route("/auth/session", post(auth::issue_session))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Grant `admin` to the configured operators. Existing grants are left alone
/// and nothing is written to the ledger.
pub async fn bootstrap_admins(db: &Database, user_ids: &[String]) -> anyhow::Result<()> {
    for user_id in user_ids {
        if roles::grant(&db.pool, user_id, Role::Admin).await? {
            info!("Bootstrapped admin {}", user_id);
        }
    }
    Ok(())
}
