use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::Result,
    instructions::{Context, Receipt},
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    state::{validate_target, validate_title, EventKind, EventStatus, Petition, TimeWindow},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePetition {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Signature goal; the default applies when omitted.
    #[serde(default)]
    pub target_signatures: Option<i64>,
}

pub fn handler(ctx: &Context, args: CreatePetition) -> Result<Receipt<Petition>> {
    enforce(ctx.actor, Operation::CreatePetition)?;

    let title = validate_title(&args.title)?;
    let window = TimeWindow::new(args.start_time, args.end_time)?;
    let target_signatures = validate_target(args.target_signatures)?;

    let id = Uuid::new_v4();
    let ledger_entry = simulate_ledger_entry(
        EventKind::Petition.created_entry_type(),
        Some(id.to_string()),
        Some(&ctx.actor.id),
        json!({ "petition_title": title }),
        ctx.now,
    );

    let petition = Petition {
        id,
        title,
        description: args.description.trim().to_string(),
        window,
        target_signatures,
        current_signatures: 0,
        status: EventStatus::Active,
        created_by: ctx.actor.id.clone(),
        blockchain_hash: Some(ledger_entry.transaction_hash.clone()),
        results_reference: None,
        created_at: ctx.now,
        updated_at: ctx.now,
    };
    log::debug!("petition {} created by {}", petition.id, petition.created_by);

    Ok(Receipt {
        record: petition,
        ledger_entry,
    })
}
