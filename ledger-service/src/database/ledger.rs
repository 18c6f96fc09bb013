//! Append-only audit ledger storage

use civic_ledger::LedgerEntry;
use sqlx::sqlite::SqliteExecutor;
use tracing::debug;

use super::models::ledger_entry_from_row;
use super::sql::{
    COUNT_LEDGER_ENTRIES_SQL, INSERT_LEDGER_ENTRY_SQL, SELECT_RECENT_LEDGER_ENTRIES_SQL,
};

pub async fn append<'c>(executor: impl SqliteExecutor<'c>, entry: &LedgerEntry) -> sqlx::Result<()> {
    debug!(
        "Appending ledger entry {} ({})",
        entry.transaction_hash, entry.transaction_type
    );
    sqlx::query(INSERT_LEDGER_ENTRY_SQL)
        .bind(entry.id.to_string())
        .bind(&entry.transaction_hash)
        .bind(entry.transaction_type.as_str())
        .bind(entry.block_number as i64)
        .bind(&entry.related_id)
        .bind(&entry.user_id)
        .bind(entry.data.to_string())
        .bind(entry.created_at)
        .execute(executor)
        .await?;
    Ok(())
}

/// Newest entries first.
pub async fn recent<'c>(
    executor: impl SqliteExecutor<'c>,
    limit: i64,
) -> sqlx::Result<Vec<LedgerEntry>> {
    let rows = sqlx::query(SELECT_RECENT_LEDGER_ENTRIES_SQL)
        .bind(limit)
        .fetch_all(executor)
        .await?;
    rows.iter().map(ledger_entry_from_row).collect()
}

pub async fn count<'c>(executor: impl SqliteExecutor<'c>) -> sqlx::Result<u64> {
    let total: i64 = sqlx::query_scalar(COUNT_LEDGER_ENTRIES_SQL)
        .fetch_one(executor)
        .await?;
    Ok(total.max(0) as u64)
}
