//! Role grant storage

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::Utc;
use civic_ledger::Role;
use sqlx::sqlite::SqliteExecutor;
use tracing::warn;

use super::sql::{DELETE_USER_ROLE_SQL, INSERT_USER_ROLE_SQL, SELECT_USER_ROLES_SQL};

pub async fn roles_for<'c>(
    executor: impl SqliteExecutor<'c>,
    user_id: &str,
) -> sqlx::Result<BTreeSet<Role>> {
    let raw: Vec<String> = sqlx::query_scalar(SELECT_USER_ROLES_SQL)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    Ok(raw
        .iter()
        .filter_map(|r| match Role::from_str(r) {
            Ok(role) => Some(role),
            Err(e) => {
                warn!("Ignoring stored role for {}: {}", user_id, e);
                None
            }
        })
        .collect())
}

/// Returns true if the grant is new.
pub async fn grant<'c>(
    executor: impl SqliteExecutor<'c>,
    user_id: &str,
    role: Role,
) -> sqlx::Result<bool> {
    let result = sqlx::query(INSERT_USER_ROLE_SQL)
        .bind(user_id)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Returns true if a grant was removed.
pub async fn revoke<'c>(
    executor: impl SqliteExecutor<'c>,
    user_id: &str,
    role: Role,
) -> sqlx::Result<bool> {
    let result = sqlx::query(DELETE_USER_ROLE_SQL)
        .bind(user_id)
        .bind(role.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}
