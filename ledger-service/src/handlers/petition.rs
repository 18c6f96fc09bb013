//! `/petition` routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::Utc;
use civic_ledger::{program, query, Actor, Context, CreatePetition, ErrorCode, Receipt};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::{parse_event_id, tracked};
use crate::database::{ledger, models::views::PetitionDetail, petitions};
use crate::error::ApiError;
use crate::metrics::Action;
use crate::state::AppState;
use crate::types::PetitionRequest;

pub async fn list_petitions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let petitions = petitions::list_active(&state.db.pool).await?;
    Ok(Json(json!({ "petitions": petitions })))
}

pub async fn get_petition(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PetitionDetail>, ApiError> {
    let id = parse_event_id(&raw_id)?;
    let petition = petitions::get_petition(&state.db.pool, id)
        .await?
        .ok_or(ErrorCode::NotFound)?;

    Ok(Json(PetitionDetail {
        progress_percent: query::petition_progress(&petition),
        target_reached: petition.has_reached_target(),
        time_remaining: query::time_remaining(&petition.window, Utc::now()),
        petition,
    }))
}

pub async fn post_petition(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<PetitionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    match request {
        PetitionRequest::Create(args) => {
            tracked(Action::CreatePetition, create_petition(&state, &actor, args)).await
        }
        PetitionRequest::Sign {
            petition_id,
            comment,
        } => {
            tracked(
                Action::SignPetition,
                sign_petition(&state, &actor, petition_id, comment),
            )
            .await
        }
        PetitionRequest::Finalize {
            petition_id,
            results_reference,
        } => {
            tracked(
                Action::FinalizePetition,
                finalize_petition(&state, &actor, petition_id, results_reference),
            )
            .await
        }
    }
}

async fn create_petition(
    state: &AppState,
    actor: &Actor,
    args: CreatePetition,
) -> Result<Json<Value>, ApiError> {
    let ctx = Context::new(actor, Utc::now());
    let Receipt {
        record: petition,
        ledger_entry,
    } = program::create_petition(&ctx, args)?;

    let mut tx = state.db.pool.begin().await?;
    petitions::insert_petition(&mut *tx, &petition).await?;
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Petition created: {}", petition.id);
    Ok(Json(json!({ "petition": petition })))
}

async fn sign_petition(
    state: &AppState,
    actor: &Actor,
    petition_id: Uuid,
    comment: Option<String>,
) -> Result<Json<Value>, ApiError> {
    let mut petition = petitions::get_petition(&state.db.pool, petition_id)
        .await?
        .ok_or(ErrorCode::NotFound)?;
    let prior_signature =
        petitions::find_user_signature(&state.db.pool, petition_id, &actor.id).await?;

    let ctx = Context::new(actor, Utc::now());
    let Receipt {
        record: signature,
        ledger_entry,
    } = program::sign_petition(&ctx, &mut petition, prior_signature.as_ref(), comment)?;

    let mut tx = state.db.pool.begin().await?;
    petitions::insert_signature(&mut *tx, &signature)
        .await
        .map_err(|e| ApiError::from_insert(e, ErrorCode::AlreadySigned))?;
    if !petitions::increment_signatures(&mut *tx, petition_id, ctx.now).await? {
        return Err(ErrorCode::EventNotActive.into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Petition signed: {}", signature.id);
    Ok(Json(json!({ "signature": signature })))
}

async fn finalize_petition(
    state: &AppState,
    actor: &Actor,
    petition_id: Uuid,
    results_reference: String,
) -> Result<Json<Value>, ApiError> {
    let mut petition = petitions::get_petition(&state.db.pool, petition_id)
        .await?
        .ok_or(ErrorCode::NotFound)?;

    let ctx = Context::new(actor, Utc::now());
    let ledger_entry = program::finalize_event(&ctx, &mut petition, &results_reference)?;

    let mut tx = state.db.pool.begin().await?;
    if !petitions::mark_finalized(&mut *tx, &petition).await? {
        return Err(ErrorCode::AlreadyFinalized.into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Petition finalized: {}", petition.id);
    Ok(Json(json!({ "petition": petition })))
}
