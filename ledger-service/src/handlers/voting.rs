//! `/voting` routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::Utc;
use civic_ledger::{
    program, query, Actor, Context, CreateVotingEvent, ErrorCode, Receipt, VoteChoice,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::{parse_event_id, tracked};
use crate::database::{ledger, models::views::VotingEventDetail, voting};
use crate::error::ApiError;
use crate::metrics::Action;
use crate::state::AppState;
use crate::types::VotingRequest;

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let events = voting::list_active(&state.db.pool).await?;
    Ok(Json(json!({ "events": events })))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<VotingEventDetail>, ApiError> {
    let id = parse_event_id(&raw_id)?;
    let event = voting::get_event(&state.db.pool, id)
        .await?
        .ok_or(ErrorCode::NotFound)?;
    let votes = voting::list_votes(&state.db.pool, id).await?;

    Ok(Json(VotingEventDetail {
        tally: query::tally(&event, &votes),
        time_remaining: query::time_remaining(&event.window, Utc::now()),
        event,
    }))
}

pub async fn post_voting(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<VotingRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    match request {
        VotingRequest::Create(args) => {
            tracked(Action::CreateVotingEvent, create_event(&state, &actor, args)).await
        }
        VotingRequest::Vote {
            voting_event_id,
            vote_option,
        } => {
            tracked(
                Action::CastVote,
                cast_vote(&state, &actor, voting_event_id, vote_option),
            )
            .await
        }
        VotingRequest::Finalize {
            voting_event_id,
            results_reference,
        } => {
            tracked(
                Action::FinalizeVotingEvent,
                finalize_event(&state, &actor, voting_event_id, results_reference),
            )
            .await
        }
    }
}

async fn create_event(
    state: &AppState,
    actor: &Actor,
    args: CreateVotingEvent,
) -> Result<Json<Value>, ApiError> {
    let ctx = Context::new(actor, Utc::now());
    let Receipt {
        record: event,
        ledger_entry,
    } = program::create_voting_event(&ctx, args)?;

    let mut tx = state.db.pool.begin().await?;
    voting::insert_event(&mut *tx, &event).await?;
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Voting event created: {}", event.id);
    Ok(Json(json!({ "event": event })))
}

async fn cast_vote(
    state: &AppState,
    actor: &Actor,
    event_id: Uuid,
    choice: VoteChoice,
) -> Result<Json<Value>, ApiError> {
    let mut event = voting::get_event(&state.db.pool, event_id)
        .await?
        .ok_or(ErrorCode::NotFound)?;
    let prior_vote = voting::find_user_vote(&state.db.pool, event_id, &actor.id).await?;

    let ctx = Context::new(actor, Utc::now());
    let Receipt {
        record: vote,
        ledger_entry,
    } = program::cast_vote(&ctx, &mut event, prior_vote.as_ref(), &choice)?;

    // The insert goes first so the unique index settles concurrent duplicates.
    let mut tx = state.db.pool.begin().await?;
    voting::insert_vote(&mut *tx, &vote)
        .await
        .map_err(|e| ApiError::from_insert(e, ErrorCode::AlreadyVoted))?;
    if !voting::increment_total_votes(&mut *tx, event_id, ctx.now).await? {
        return Err(ErrorCode::EventNotActive.into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Vote cast: {}", vote.id);
    Ok(Json(json!({ "vote": vote })))
}

async fn finalize_event(
    state: &AppState,
    actor: &Actor,
    event_id: Uuid,
    results_reference: String,
) -> Result<Json<Value>, ApiError> {
    let mut event = voting::get_event(&state.db.pool, event_id)
        .await?
        .ok_or(ErrorCode::NotFound)?;

    let ctx = Context::new(actor, Utc::now());
    let ledger_entry = program::finalize_event(&ctx, &mut event, &results_reference)?;

    let mut tx = state.db.pool.begin().await?;
    if !voting::mark_finalized(&mut *tx, &event).await? {
        return Err(ErrorCode::AlreadyFinalized.into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Voting event finalized: {}", event.id);
    Ok(Json(json!({ "event": event })))
}
