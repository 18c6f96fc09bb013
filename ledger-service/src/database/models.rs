//! Row mapping between SQLite rows and domain records.

pub mod views;

use std::num::NonZeroU32;
use std::str::FromStr;

use civic_ledger::{
    ContractDeployment, DeploymentStatus, EventStatus, EventTemplate, LedgerEntry,
    LedgerEntryType, Petition, Signature, TemplateKind, TimeWindow, Vote, VotingEvent,
};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

fn decode_error(message: impl Into<String>) -> sqlx::Error {
    sqlx::Error::Decode(message.into().into())
}

fn uuid_column(row: &SqliteRow, column: &str) -> sqlx::Result<Uuid> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| decode_error(format!("{column}: {e}")))
}

fn count_column(row: &SqliteRow, column: &str) -> sqlx::Result<u64> {
    let raw: i64 = row.try_get(column)?;
    u64::try_from(raw).map_err(|_| decode_error(format!("{column}: negative count {raw}")))
}

fn json_column(row: &SqliteRow, column: &str) -> sqlx::Result<serde_json::Value> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| decode_error(format!("{column}: {e}")))
}

fn status_column(row: &SqliteRow) -> sqlx::Result<EventStatus> {
    let raw: String = row.try_get("status")?;
    EventStatus::from_str(&raw).map_err(|e| decode_error(e.to_string()))
}

fn window_columns(row: &SqliteRow) -> sqlx::Result<TimeWindow> {
    Ok(TimeWindow {
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
    })
}

pub fn voting_event_from_row(row: &SqliteRow) -> sqlx::Result<VotingEvent> {
    let options_json: String = row.try_get("options")?;
    let options: Vec<String> =
        serde_json::from_str(&options_json).map_err(|e| decode_error(format!("options: {e}")))?;

    Ok(VotingEvent {
        id: uuid_column(row, "id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        options,
        window: window_columns(row)?,
        status: status_column(row)?,
        created_by: row.try_get("created_by")?,
        total_votes: count_column(row, "total_votes")?,
        blockchain_hash: row.try_get("blockchain_hash")?,
        results_reference: row.try_get("results_reference")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub fn vote_from_row(row: &SqliteRow) -> sqlx::Result<Vote> {
    Ok(Vote {
        id: uuid_column(row, "id")?,
        voting_event_id: uuid_column(row, "voting_event_id")?,
        user_id: row.try_get("user_id")?,
        vote_option: row.try_get("vote_option")?,
        option_index: row.try_get("option_index")?,
        blockchain_hash: row.try_get("blockchain_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

pub fn petition_from_row(row: &SqliteRow) -> sqlx::Result<Petition> {
    let target: i64 = row.try_get("target_signatures")?;
    let target_signatures = u32::try_from(target)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| decode_error(format!("target_signatures: {target}")))?;

    Ok(Petition {
        id: uuid_column(row, "id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        window: window_columns(row)?,
        target_signatures,
        current_signatures: count_column(row, "current_signatures")?,
        status: status_column(row)?,
        created_by: row.try_get("created_by")?,
        blockchain_hash: row.try_get("blockchain_hash")?,
        results_reference: row.try_get("results_reference")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub fn signature_from_row(row: &SqliteRow) -> sqlx::Result<Signature> {
    Ok(Signature {
        id: uuid_column(row, "id")?,
        petition_id: uuid_column(row, "petition_id")?,
        user_id: row.try_get("user_id")?,
        comment: row.try_get("comment")?,
        blockchain_hash: row.try_get("blockchain_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

pub fn ledger_entry_from_row(row: &SqliteRow) -> sqlx::Result<LedgerEntry> {
    let transaction_type: String = row.try_get("transaction_type")?;
    let data: String = row.try_get("data")?;

    Ok(LedgerEntry {
        id: uuid_column(row, "id")?,
        transaction_hash: row.try_get("transaction_hash")?,
        transaction_type: LedgerEntryType::from_str(&transaction_type).map_err(decode_error)?,
        block_number: count_column(row, "block_number")?,
        related_id: row.try_get("related_id")?,
        user_id: row.try_get("user_id")?,
        data: serde_json::from_str(&data).map_err(|e| decode_error(format!("data: {e}")))?,
        created_at: row.try_get("created_at")?,
    })
}

pub fn template_from_row(row: &SqliteRow) -> sqlx::Result<EventTemplate> {
    let kind: String = row.try_get("type")?;

    Ok(EventTemplate {
        id: uuid_column(row, "id")?,
        name: row.try_get("name")?,
        kind: TemplateKind::from_str(&kind).map_err(|e| decode_error(e.to_string()))?,
        description: row.try_get("description")?,
        config: json_column(row, "config")?,
        created_by: row.try_get("created_by")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub fn deployment_from_row(row: &SqliteRow) -> sqlx::Result<ContractDeployment> {
    let status: String = row.try_get("status")?;

    Ok(ContractDeployment {
        id: uuid_column(row, "id")?,
        template_id: uuid_column(row, "template_id")?,
        contract_address: row.try_get("contract_address")?,
        network_id: row.try_get("network_id")?,
        deployer_id: row.try_get("deployer_id")?,
        deployment_params: json_column(row, "deployment_params")?,
        block_number: count_column(row, "block_number")?,
        status: DeploymentStatus::from_str(&status).map_err(decode_error)?,
        created_at: row.try_get("created_at")?,
    })
}
