pub mod constants;
pub mod ledger;
pub mod migrator;
pub mod models;
pub mod path;
pub mod petitions;
pub mod roles;
pub mod sql;
pub mod templates;
pub mod voting;

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub use migrator::run_migrations;
pub use path::validate_db_path;

use constants::MEMORY_DB_PATH;

/// Pooled handle to the SQLite store.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at `db_path` and run migrations.
    pub async fn connect(db_path: &str) -> Result<Self> {
        validate_db_path(db_path)?;
        info!("Opening database at {:?}", db_path);

        let pool = if db_path == MEMORY_DB_PATH {
            // Every connection to :memory: is a separate database, so keep
            // exactly one alive for the lifetime of the pool.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true))
                .await?
        } else {
            let options = SqliteConnectOptions::new()
                .filename(db_path)
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().connect_with(options).await?
        };

        run_migrations(&pool).await?;
        info!("Database ready");

        Ok(Database { pool })
    }
}
