//! Store operations for petitions and signatures

use chrono::{DateTime, Utc};
use civic_ledger::{EventStatus, Petition, Signature};
use sqlx::sqlite::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use super::models::{petition_from_row, signature_from_row};
use super::sql::{
    DELETE_PETITION_SQL, FINALIZE_PETITION_SQL, INCREMENT_SIGNATURES_SQL, INSERT_PETITION_SQL,
    INSERT_SIGNATURE_SQL, SELECT_ACTIVE_PETITIONS_SQL, SELECT_ALL_PETITIONS_SQL,
    SELECT_PETITION_SIGNATURES_SQL, SELECT_PETITION_SQL, SELECT_USER_SIGNATURE_SQL,
    UPDATE_PETITION_STATUS_SQL,
};

pub async fn insert_petition<'c>(
    executor: impl SqliteExecutor<'c>,
    petition: &Petition,
) -> sqlx::Result<()> {
    debug!("Inserting petition {}", petition.id);
    sqlx::query(INSERT_PETITION_SQL)
        .bind(petition.id.to_string())
        .bind(&petition.title)
        .bind(&petition.description)
        .bind(petition.window.start_time)
        .bind(petition.window.end_time)
        .bind(petition.target_signatures.get())
        .bind(petition.current_signatures as i64)
        .bind(petition.status.as_str())
        .bind(&petition.created_by)
        .bind(&petition.blockchain_hash)
        .bind(&petition.results_reference)
        .bind(petition.created_at)
        .bind(petition.updated_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_petition<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
) -> sqlx::Result<Option<Petition>> {
    sqlx::query(SELECT_PETITION_SQL)
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .map(|row| petition_from_row(&row))
        .transpose()
}

pub async fn list_active<'c>(executor: impl SqliteExecutor<'c>) -> sqlx::Result<Vec<Petition>> {
    let rows = sqlx::query(SELECT_ACTIVE_PETITIONS_SQL)
        .fetch_all(executor)
        .await?;
    rows.iter().map(petition_from_row).collect()
}

pub async fn list_all<'c>(executor: impl SqliteExecutor<'c>) -> sqlx::Result<Vec<Petition>> {
    let rows = sqlx::query(SELECT_ALL_PETITIONS_SQL)
        .fetch_all(executor)
        .await?;
    rows.iter().map(petition_from_row).collect()
}

pub async fn increment_signatures<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
    now: DateTime<Utc>,
) -> sqlx::Result<bool> {
    let result = sqlx::query(INCREMENT_SIGNATURES_SQL)
        .bind(now)
        .bind(id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn mark_finalized<'c>(
    executor: impl SqliteExecutor<'c>,
    petition: &Petition,
) -> sqlx::Result<bool> {
    let result = sqlx::query(FINALIZE_PETITION_SQL)
        .bind(&petition.results_reference)
        .bind(petition.updated_at)
        .bind(petition.id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn update_status<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
    expected: EventStatus,
    next: EventStatus,
    now: DateTime<Utc>,
) -> sqlx::Result<bool> {
    let result = sqlx::query(UPDATE_PETITION_STATUS_SQL)
        .bind(next.as_str())
        .bind(now)
        .bind(id.to_string())
        .bind(expected.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn delete_petition<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
) -> sqlx::Result<bool> {
    let result = sqlx::query(DELETE_PETITION_SQL)
        .bind(id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn insert_signature<'c>(
    executor: impl SqliteExecutor<'c>,
    signature: &Signature,
) -> sqlx::Result<()> {
    debug!(
        "Inserting signature {} on {}",
        signature.id, signature.petition_id
    );
    sqlx::query(INSERT_SIGNATURE_SQL)
        .bind(signature.id.to_string())
        .bind(signature.petition_id.to_string())
        .bind(&signature.user_id)
        .bind(&signature.comment)
        .bind(&signature.blockchain_hash)
        .bind(signature.created_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn find_user_signature<'c>(
    executor: impl SqliteExecutor<'c>,
    petition_id: Uuid,
    user_id: &str,
) -> sqlx::Result<Option<Signature>> {
    sqlx::query(SELECT_USER_SIGNATURE_SQL)
        .bind(petition_id.to_string())
        .bind(user_id)
        .fetch_optional(executor)
        .await?
        .map(|row| signature_from_row(&row))
        .transpose()
}

pub async fn list_signatures<'c>(
    executor: impl SqliteExecutor<'c>,
    petition_id: Uuid,
) -> sqlx::Result<Vec<Signature>> {
    let rows = sqlx::query(SELECT_PETITION_SIGNATURES_SQL)
        .bind(petition_id.to_string())
        .fetch_all(executor)
        .await?;
    rows.iter().map(signature_from_row).collect()
}
