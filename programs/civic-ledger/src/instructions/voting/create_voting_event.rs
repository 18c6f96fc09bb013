use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::Result,
    instructions::{Context, Receipt},
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    state::{
        normalize_options, validate_title, EventKind, EventStatus, TimeWindow, VotingEvent,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVotingEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub fn handler(ctx: &Context, args: CreateVotingEvent) -> Result<Receipt<VotingEvent>> {
    enforce(ctx.actor, Operation::CreateVotingEvent)?;

    let title = validate_title(&args.title)?;
    let window = TimeWindow::new(args.start_time, args.end_time)?;
    let options = normalize_options(args.options)?;

    let id = Uuid::new_v4();
    let ledger_entry = simulate_ledger_entry(
        EventKind::Voting.created_entry_type(),
        Some(id.to_string()),
        Some(&ctx.actor.id),
        json!({ "event_title": title }),
        ctx.now,
    );

    let event = VotingEvent {
        id,
        title,
        description: args.description.trim().to_string(),
        options,
        window,
        status: EventStatus::Active,
        created_by: ctx.actor.id.clone(),
        total_votes: 0,
        blockchain_hash: Some(ledger_entry.transaction_hash.clone()),
        results_reference: None,
        created_at: ctx.now,
        updated_at: ctx.now,
    };
    log::debug!("voting event {} created by {}", event.id, event.created_by);

    Ok(Receipt {
        record: event,
        ledger_entry,
    })
}
