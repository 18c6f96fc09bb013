//! Simulated ledger.
//!
//! Entries mimic blockchain transaction records: a random 32-byte hash and a
//! random block number above a fixed baseline. Neither value is derived from
//! the entry's content and nothing anchors them to a real chain.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{LedgerEntry, LedgerEntryType};

pub const BLOCK_NUMBER_BASELINE: u64 = 15_000_000;
pub const BLOCK_NUMBER_SPREAD: u64 = 1_000_000;
/// Number of entries shown in the status view.
pub const RECENT_ENTRIES: usize = 10;

pub fn simulate_ledger_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 32] = rng.gen();
    format!("0x{}", hex::encode(bytes))
}

/// Random 20-byte contract address, `0x` prefixed.
pub fn simulate_contract_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 20] = rng.gen();
    format!("0x{}", hex::encode(bytes))
}

pub fn simulate_block_number<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    BLOCK_NUMBER_BASELINE + rng.gen_range(0..BLOCK_NUMBER_SPREAD)
}

/// Build the audit record for one state-changing action.
pub fn simulate_ledger_entry(
    transaction_type: LedgerEntryType,
    related_id: Option<String>,
    user_id: Option<&str>,
    data: serde_json::Value,
    now: DateTime<Utc>,
) -> LedgerEntry {
    let mut rng = rand::thread_rng();
    LedgerEntry {
        id: Uuid::new_v4(),
        transaction_hash: simulate_ledger_hash(&mut rng),
        transaction_type,
        block_number: simulate_block_number(&mut rng),
        related_id,
        user_id: user_id.map(str::to_string),
        data,
        created_at: now,
    }
}

/// Compact view of a ledger entry for status displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntrySummary {
    pub hash: String,
    #[serde(rename = "type")]
    pub entry_type: LedgerEntryType,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
}

impl From<&LedgerEntry> for LedgerEntrySummary {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            hash: entry.transaction_hash.clone(),
            entry_type: entry.transaction_type,
            block_number: entry.block_number,
            timestamp: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub current_block_height: u64,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub latest_transaction: Option<LedgerEntrySummary>,
    pub stats: LedgerStats,
    pub recent_transactions: Vec<LedgerEntrySummary>,
}

/// Summarize the ledger from its newest entries (newest first) and total size.
pub fn ledger_status(recent: &[LedgerEntry], total_transactions: u64) -> LedgerStatus {
    let recent_transactions: Vec<LedgerEntrySummary> = recent
        .iter()
        .take(RECENT_ENTRIES)
        .map(LedgerEntrySummary::from)
        .collect();
    let latest_transaction = recent_transactions.first().cloned();
    let current_block_height = latest_transaction
        .as_ref()
        .map_or(BLOCK_NUMBER_BASELINE, |latest| latest.block_number);

    LedgerStatus {
        latest_transaction,
        stats: LedgerStats {
            current_block_height,
            total_transactions,
        },
        recent_transactions,
    }
}
