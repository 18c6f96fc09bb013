use serde_json::json;

use crate::{
    error::{ErrorCode, Result},
    instructions::Context,
    ledger::simulate_ledger_entry,
    policy::{enforce_owner_or, Operation},
    require,
    state::{EventStatus, LedgerEntry, Lifecycle},
};

/// Close an event whose window has ended and attach its results reference.
/// Succeeds at most once per event.
pub fn handler<E: Lifecycle>(
    ctx: &Context,
    event: &mut E,
    results_reference: &str,
) -> Result<LedgerEntry> {
    enforce_owner_or(ctx.actor, event.created_by(), Operation::FinalizeEvent)?;

    require!(
        event.status() != EventStatus::Completed,
        ErrorCode::AlreadyFinalized
    );
    require!(
        event.status() == EventStatus::Active,
        ErrorCode::EventNotActive
    );
    require!(event.window().has_ended(ctx.now), ErrorCode::NotYetEnded);

    let results_reference = results_reference.trim();
    require!(
        !results_reference.is_empty(),
        ErrorCode::BlankResultsReference
    );

    event.set_status(EventStatus::Completed, ctx.now);
    event.set_results_reference(results_reference.to_string());

    Ok(simulate_ledger_entry(
        E::KIND.finalized_entry_type(),
        Some(event.id().to_string()),
        Some(&ctx.actor.id),
        json!({
            "results_reference": results_reference,
            "participation": event.participation_count(),
        }),
        ctx.now,
    ))
}
