use serde_json::json;

use crate::{
    error::Result,
    instructions::Context,
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    state::{LedgerEntry, LedgerEntryType, Lifecycle},
};

/// Authorize removal of an event and its participation records. The ledger
/// keeps every earlier entry for the event; this one marks the removal.
pub fn handler<E: Lifecycle>(ctx: &Context, event: &E) -> Result<LedgerEntry> {
    enforce(ctx.actor, Operation::DeleteEvent)?;

    Ok(simulate_ledger_entry(
        LedgerEntryType::EventDeleted,
        Some(event.id().to_string()),
        Some(&ctx.actor.id),
        json!({
            "event_type": E::KIND,
            "status": event.status(),
            "removed_participation": event.participation_count(),
        }),
        ctx.now,
    ))
}
