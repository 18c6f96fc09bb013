//! Service configuration read from the environment at startup

use anyhow::{bail, Result};

use crate::database::{constants::DEFAULT_DB_PATH, validate_db_path};
use crate::utils::{env_parse, split_list};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 20;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db_path: String,
    pub port: u16,
    /// Shared secret the identity provider presents to mint sessions.
    pub session_issuer_token: String,
    pub session_ttl_seconds: u64,
    /// `/admin/stats` is disabled when unset.
    pub metrics_auth_token: Option<String>,
    /// Actors granted `admin` at startup.
    pub bootstrap_admins: Vec<String>,
    /// Requests per second per client IP; 0 disables rate limiting.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl ServiceConfig {
    /// Defaults for everything except the issuer token.
    pub fn new(db_path: impl Into<String>, session_issuer_token: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            port: DEFAULT_PORT,
            session_issuer_token: session_issuer_token.into(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            metrics_auth_token: None,
            bootstrap_admins: Vec::new(),
            rate_limit_per_second: 0,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
        }
    }

    pub fn from_env() -> Result<Self> {
        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        validate_db_path(&db_path)?;

        let session_issuer_token = std::env::var("SESSION_ISSUER_TOKEN").unwrap_or_default();
        if session_issuer_token.trim().is_empty() {
            bail!("SESSION_ISSUER_TOKEN must be set");
        }

        let session_ttl_seconds = env_parse("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS);
        if session_ttl_seconds == 0 {
            bail!("SESSION_TTL_SECONDS must be greater than 0");
        }

        let metrics_auth_token = std::env::var("METRICS_AUTH_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let bootstrap_admins = std::env::var("BOOTSTRAP_ADMINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            db_path,
            port: env_parse("PORT", DEFAULT_PORT),
            session_issuer_token,
            session_ttl_seconds,
            metrics_auth_token,
            bootstrap_admins,
            rate_limit_per_second: env_parse("RATE_LIMIT_PER_SECOND", 0),
            rate_limit_burst: env_parse("RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST).max(1),
        })
    }

    pub fn rate_limit_enabled(&self) -> bool {
        self.rate_limit_per_second > 0
    }
}
