//! Store operations for voting events and votes

use chrono::{DateTime, Utc};
use civic_ledger::{EventStatus, Vote, VotingEvent};
use sqlx::sqlite::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use super::models::{vote_from_row, voting_event_from_row};
use super::sql::{
    DELETE_VOTING_EVENT_SQL, FINALIZE_VOTING_EVENT_SQL, INCREMENT_TOTAL_VOTES_SQL,
    INSERT_VOTE_SQL, INSERT_VOTING_EVENT_SQL, SELECT_ACTIVE_VOTING_EVENTS_SQL,
    SELECT_ALL_VOTING_EVENTS_SQL, SELECT_EVENT_VOTES_SQL, SELECT_USER_VOTE_SQL,
    SELECT_VOTING_EVENT_SQL, UPDATE_VOTING_EVENT_STATUS_SQL,
};

pub async fn insert_event<'c>(
    executor: impl SqliteExecutor<'c>,
    event: &VotingEvent,
) -> sqlx::Result<()> {
    debug!("Inserting voting event {}", event.id);
    let options = serde_json::to_string(&event.options)
        .map_err(|e| sqlx::Error::Protocol(format!("options: {e}")))?;

    sqlx::query(INSERT_VOTING_EVENT_SQL)
        .bind(event.id.to_string())
        .bind(&event.title)
        .bind(&event.description)
        .bind(options)
        .bind(event.window.start_time)
        .bind(event.window.end_time)
        .bind(event.status.as_str())
        .bind(&event.created_by)
        .bind(event.total_votes as i64)
        .bind(&event.blockchain_hash)
        .bind(&event.results_reference)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_event<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
) -> sqlx::Result<Option<VotingEvent>> {
    sqlx::query(SELECT_VOTING_EVENT_SQL)
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .map(|row| voting_event_from_row(&row))
        .transpose()
}

pub async fn list_active<'c>(executor: impl SqliteExecutor<'c>) -> sqlx::Result<Vec<VotingEvent>> {
    let rows = sqlx::query(SELECT_ACTIVE_VOTING_EVENTS_SQL)
        .fetch_all(executor)
        .await?;
    rows.iter().map(voting_event_from_row).collect()
}

pub async fn list_all<'c>(executor: impl SqliteExecutor<'c>) -> sqlx::Result<Vec<VotingEvent>> {
    let rows = sqlx::query(SELECT_ALL_VOTING_EVENTS_SQL)
        .fetch_all(executor)
        .await?;
    rows.iter().map(voting_event_from_row).collect()
}

/// Bump `total_votes` on an active event. Returns false if the event is gone
/// or no longer active.
pub async fn increment_total_votes<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
    now: DateTime<Utc>,
) -> sqlx::Result<bool> {
    let result = sqlx::query(INCREMENT_TOTAL_VOTES_SQL)
        .bind(now)
        .bind(id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Move an active event to `completed`. Returns false if another caller got
/// there first.
pub async fn mark_finalized<'c>(
    executor: impl SqliteExecutor<'c>,
    event: &VotingEvent,
) -> sqlx::Result<bool> {
    let result = sqlx::query(FINALIZE_VOTING_EVENT_SQL)
        .bind(&event.results_reference)
        .bind(event.updated_at)
        .bind(event.id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Compare-and-set the status column.
pub async fn update_status<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
    expected: EventStatus,
    next: EventStatus,
    now: DateTime<Utc>,
) -> sqlx::Result<bool> {
    let result = sqlx::query(UPDATE_VOTING_EVENT_STATUS_SQL)
        .bind(next.as_str())
        .bind(now)
        .bind(id.to_string())
        .bind(expected.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Remove the event; its votes go with it.
pub async fn delete_event<'c>(executor: impl SqliteExecutor<'c>, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query(DELETE_VOTING_EVENT_SQL)
        .bind(id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn insert_vote<'c>(executor: impl SqliteExecutor<'c>, vote: &Vote) -> sqlx::Result<()> {
    debug!("Inserting vote {} on {}", vote.id, vote.voting_event_id);
    sqlx::query(INSERT_VOTE_SQL)
        .bind(vote.id.to_string())
        .bind(vote.voting_event_id.to_string())
        .bind(&vote.user_id)
        .bind(&vote.vote_option)
        .bind(vote.option_index)
        .bind(&vote.blockchain_hash)
        .bind(vote.created_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn find_user_vote<'c>(
    executor: impl SqliteExecutor<'c>,
    event_id: Uuid,
    user_id: &str,
) -> sqlx::Result<Option<Vote>> {
    sqlx::query(SELECT_USER_VOTE_SQL)
        .bind(event_id.to_string())
        .bind(user_id)
        .fetch_optional(executor)
        .await?
        .map(|row| vote_from_row(&row))
        .transpose()
}

pub async fn list_votes<'c>(
    executor: impl SqliteExecutor<'c>,
    event_id: Uuid,
) -> sqlx::Result<Vec<Vote>> {
    let rows = sqlx::query(SELECT_EVENT_VOTES_SQL)
        .bind(event_id.to_string())
        .fetch_all(executor)
        .await?;
    rows.iter().map(vote_from_row).collect()
}
