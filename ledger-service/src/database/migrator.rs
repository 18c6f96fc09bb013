//! Versioned schema migrations (SQLx)

use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};
use tracing::info;

use super::constants::{CURRENT_SCHEMA_VERSION, MIGRATION_DESCRIPTIONS};
use super::sql::{
    CREATE_CONTRACT_DEPLOYMENTS_TABLE_SQL, CREATE_DB_INDEXES, CREATE_EVENT_TEMPLATES_TABLE_SQL,
    CREATE_LEDGER_TABLE_SQL, CREATE_MIGRATIONS_TABLE_SQL, CREATE_PETITION_EVENTS_TABLE_SQL,
    CREATE_PETITION_SIGNATURES_TABLE_SQL, CREATE_TEMPLATE_INDEXES, CREATE_USER_ROLES_TABLE_SQL,
    CREATE_VOTES_TABLE_SQL, CREATE_VOTING_EVENTS_TABLE_SQL,
};

/// Bring the schema up to [`CURRENT_SCHEMA_VERSION`].
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_MIGRATIONS_TABLE_SQL)
        .execute(pool)
        .await?;

    let current_version = current_version(pool).await?;
    info!(
        "Schema at version {} (latest {})",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        apply_migration_v1(pool).await?;
    }
    if current_version < 2 {
        apply_migration_v2(pool).await?;
    }

    Ok(())
}

pub async fn current_version(pool: &SqlitePool) -> Result<i32> {
    let version: Option<i32> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(version.unwrap_or(0))
}

async fn apply_migration_v1(pool: &SqlitePool) -> Result<()> {
    info!("Applying migration v1: {}", MIGRATION_DESCRIPTIONS[0]);

    let mut tx = pool.begin().await?;

    for table_sql in [
        CREATE_VOTING_EVENTS_TABLE_SQL,
        CREATE_VOTES_TABLE_SQL,
        CREATE_PETITION_EVENTS_TABLE_SQL,
        CREATE_PETITION_SIGNATURES_TABLE_SQL,
        CREATE_LEDGER_TABLE_SQL,
        CREATE_USER_ROLES_TABLE_SQL,
    ] {
        sqlx::query(table_sql).execute(&mut *tx).await?;
    }

    for index_sql in CREATE_DB_INDEXES {
        sqlx::query(index_sql).execute(&mut *tx).await?;
    }

    record_migration(&mut tx, 1).await?;
    tx.commit().await?;
    Ok(())
}

async fn apply_migration_v2(pool: &SqlitePool) -> Result<()> {
    info!("Applying migration v2: {}", MIGRATION_DESCRIPTIONS[1]);

    let mut tx = pool.begin().await?;

    for table_sql in [
        CREATE_EVENT_TEMPLATES_TABLE_SQL,
        CREATE_CONTRACT_DEPLOYMENTS_TABLE_SQL,
    ] {
        sqlx::query(table_sql).execute(&mut *tx).await?;
    }

    for index_sql in CREATE_TEMPLATE_INDEXES {
        sqlx::query(index_sql).execute(&mut *tx).await?;
    }

    record_migration(&mut tx, 2).await?;
    tx.commit().await?;
    Ok(())
}

async fn record_migration(tx: &mut Transaction<'_, Sqlite>, version: i32) -> Result<()> {
    sqlx::query(
        "INSERT INTO schema_migrations (version, applied_at, description) VALUES (?, ?, ?)",
    )
    .bind(version)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(MIGRATION_DESCRIPTIONS[(version - 1) as usize])
    .execute(&mut **tx)
    .await?;
    Ok(())
}
