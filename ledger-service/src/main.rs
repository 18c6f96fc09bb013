use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::middleware::from_fn;
use ledger_service::{
    bootstrap_admins, build_router, config::ServiceConfig, database::Database,
    middleware::inject_client_ip, state::AppState,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Civic Ledger Service");

    let config = ServiceConfig::from_env()?;
    let db = Database::connect(&config.db_path).await?;
    bootstrap_admins(&db, &config.bootstrap_admins).await?;
    info!("Database initialized successfully");

    let port = config.port;
    let rate_limit = config
        .rate_limit_enabled()
        .then_some((config.rate_limit_per_second, config.rate_limit_burst));
    let state = AppState::new(db, config);

    let mut app = build_router(state);
    if let Some((per_second, burst)) = rate_limit {
        // One token every 1000/per_second ms, keyed on the injected client IP
        let governor = GovernorConfigBuilder::default()
            .per_millisecond((1000 / per_second).max(1))
            .burst_size(burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .context("invalid rate limit configuration")?;
        app = app
            .layer(GovernorLayer {
                config: Arc::new(governor),
            })
            .layer(from_fn(inject_client_ip));
        info!("Rate limiting {} req/s per IP, burst {}", per_second, burst);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
