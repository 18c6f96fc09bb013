use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ErrorCode, Result},
    instructions::{Context, Receipt},
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    require,
    state::{EventStatus, LedgerEntryType, Vote, VoteChoice, VotingEvent},
};

/// Record the caller's vote on `event`.
///
/// `prior_vote` is the caller's existing vote on this event, if the store has
/// one. The store's own uniqueness constraint still decides races between
/// concurrent callers.
pub fn handler(
    ctx: &Context,
    event: &mut VotingEvent,
    prior_vote: Option<&Vote>,
    choice: &VoteChoice,
) -> Result<Receipt<Vote>> {
    enforce(ctx.actor, Operation::CastVote)?;

    require!(event.status == EventStatus::Active, ErrorCode::EventNotActive);
    require!(event.window.has_started(ctx.now), ErrorCode::NotStarted);
    require!(!event.window.has_ended(ctx.now), ErrorCode::Expired);
    require!(prior_vote.is_none(), ErrorCode::AlreadyVoted);

    let index = event
        .option_index(choice)
        .ok_or(ErrorCode::InvalidOption)?;
    let option_index = u32::try_from(index).map_err(|_| ErrorCode::InvalidOption)?;
    let vote_option = event.options[index].clone();

    let id = Uuid::new_v4();
    let ledger_entry = simulate_ledger_entry(
        LedgerEntryType::VoteCast,
        Some(id.to_string()),
        Some(&ctx.actor.id),
        json!({
            "voting_event_id": event.id,
            "vote_option": vote_option,
        }),
        ctx.now,
    );

    event.total_votes += 1;
    event.updated_at = ctx.now;

    let vote = Vote {
        id,
        voting_event_id: event.id,
        user_id: ctx.actor.id.clone(),
        vote_option,
        option_index,
        blockchain_hash: Some(ledger_entry.transaction_hash.clone()),
        created_at: ctx.now,
    };

    Ok(Receipt {
        record: vote,
        ledger_entry,
    })
}
