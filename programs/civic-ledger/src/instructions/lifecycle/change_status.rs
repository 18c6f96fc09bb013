use serde_json::json;

use crate::{
    error::{ErrorCode, Result},
    instructions::Context,
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    require,
    state::{EventStatus, LedgerEntry, LedgerEntryType, Lifecycle},
};

/// Administrative status change. `completed` is only reachable by finalizing.
pub fn handler<E: Lifecycle>(
    ctx: &Context,
    event: &mut E,
    next: EventStatus,
) -> Result<LedgerEntry> {
    enforce(ctx.actor, Operation::ChangeStatus)?;

    let current = event.status();
    require!(
        next != EventStatus::Completed && current.can_transition_to(next),
        ErrorCode::InvalidStatusTransition {
            from: current,
            to: next,
        }
    );

    event.set_status(next, ctx.now);
    log::debug!("{} {} moved {} -> {}", E::KIND, event.id(), current, next);

    Ok(simulate_ledger_entry(
        LedgerEntryType::EventStatusChanged,
        Some(event.id().to_string()),
        Some(&ctx.actor.id),
        json!({
            "event_type": E::KIND,
            "from": current,
            "to": next,
        }),
        ctx.now,
    ))
}
