use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ErrorCode, Result},
    instructions::{Context, Receipt},
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    require,
    state::{EventStatus, LedgerEntryType, Petition, Signature},
};

/// Add the caller's signature to `petition`. There is no upper bound on
/// signatures; crossing the target leaves the petition open.
pub fn handler(
    ctx: &Context,
    petition: &mut Petition,
    prior_signature: Option<&Signature>,
    comment: Option<String>,
) -> Result<Receipt<Signature>> {
    enforce(ctx.actor, Operation::SignPetition)?;

    require!(petition.status == EventStatus::Active, ErrorCode::EventNotActive);
    require!(petition.window.has_started(ctx.now), ErrorCode::NotStarted);
    require!(!petition.window.has_ended(ctx.now), ErrorCode::Expired);
    require!(prior_signature.is_none(), ErrorCode::AlreadySigned);

    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let id = Uuid::new_v4();
    let ledger_entry = simulate_ledger_entry(
        LedgerEntryType::PetitionSigned,
        Some(id.to_string()),
        Some(&ctx.actor.id),
        json!({ "petition_id": petition.id }),
        ctx.now,
    );

    petition.current_signatures += 1;
    petition.updated_at = ctx.now;

    let signature = Signature {
        id,
        petition_id: petition.id,
        user_id: ctx.actor.id.clone(),
        comment,
        blockchain_hash: Some(ledger_entry.transaction_hash.clone()),
        created_at: ctx.now,
    };

    Ok(Receipt {
        record: signature,
        ledger_entry,
    })
}
