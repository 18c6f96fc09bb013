use civic_ledger::{
    ledger::{ledger_status, LedgerStatus},
    query::{tally, OptionTally},
    LedgerEntry, LedgerEntryType,
};
use uuid::Uuid;

use crate::utils::send_utils::InMemoryLedger;

pub fn fetch_tally(ledger: &InMemoryLedger, event_id: Uuid) -> Vec<OptionTally> {
    let event = &ledger.voting_events[&event_id];
    tally(event, &ledger.votes)
}

pub fn fetch_entries_of_type(ledger: &InMemoryLedger, entry_type: LedgerEntryType) -> Vec<&LedgerEntry> {
    ledger
        .entries
        .iter()
        .filter(|e| e.transaction_type == entry_type)
        .collect()
}

pub fn fetch_ledger_status(ledger: &InMemoryLedger) -> LedgerStatus {
    let newest_first: Vec<LedgerEntry> = ledger.entries.iter().rev().cloned().collect();
    ledger_status(&newest_first, ledger.entries.len() as u64)
}
