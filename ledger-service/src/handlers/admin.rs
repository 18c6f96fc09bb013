//! `/admin` route
//!
//! Every action requires the `admin` role. A body without an `action` field
//! lists events.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use civic_ledger::{
    policy::{enforce, Operation},
    program, Actor, Context, ErrorCode, EventKind, EventStatus, Role,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::tracked;
use crate::database::{
    constants::TRANSACTIONS_PAGE_SIZE, ledger, models::views::Participants, petitions, roles,
    voting,
};
use crate::error::ApiError;
use crate::metrics::Action;
use crate::state::AppState;
use crate::types::{role_targets, AdminRequest};

const DEFAULT_ACTION: &str = "events";

pub async fn post_admin(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    tracked(Action::Admin, async {
        enforce(&actor, Operation::ReadAdmin)?;
        let request = parse_admin_request(body?.0)?;
        dispatch(&state, &actor, request).await
    })
    .await
}

fn parse_admin_request(mut body: Value) -> Result<AdminRequest, ApiError> {
    let fields = body
        .as_object_mut()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;
    fields
        .entry("action")
        .or_insert_with(|| Value::from(DEFAULT_ACTION));

    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn dispatch(
    state: &AppState,
    actor: &Actor,
    request: AdminRequest,
) -> Result<Json<Value>, ApiError> {
    let pool = &state.db.pool;
    match request {
        AdminRequest::Events => {
            let voting = voting::list_all(pool).await?;
            let petitions = petitions::list_all(pool).await?;
            Ok(Json(json!({ "voting": voting, "petitions": petitions })))
        }
        AdminRequest::Participants {
            event_id,
            event_type,
        } => {
            let participants = match event_type {
                EventKind::Voting => Participants::Votes(voting::list_votes(pool, event_id).await?),
                EventKind::Petition => {
                    Participants::Signatures(petitions::list_signatures(pool, event_id).await?)
                }
            };
            Ok(Json(json!({ "participants": participants })))
        }
        AdminRequest::Transactions => {
            let transactions = ledger::recent(pool, TRANSACTIONS_PAGE_SIZE).await?;
            Ok(Json(json!({ "transactions": transactions })))
        }
        AdminRequest::DeleteEvent {
            event_id,
            event_type,
        } => {
            delete_event(state, actor, event_id, event_type).await?;
            Ok(Json(json!({ "success": true })))
        }
        AdminRequest::ChangeStatus {
            event_id,
            event_type,
            status,
        } => {
            change_status(state, actor, event_id, event_type, status).await?;
            Ok(Json(json!({ "success": true })))
        }
        AdminRequest::GrantRole {
            user_id,
            user_ids,
            role,
        } => {
            let changed = update_roles(state, actor, role_targets(user_id, user_ids), role, true).await?;
            Ok(Json(json!({ "success": true, "changed": changed })))
        }
        AdminRequest::RevokeRole {
            user_id,
            user_ids,
            role,
        } => {
            let changed =
                update_roles(state, actor, role_targets(user_id, user_ids), role, false).await?;
            Ok(Json(json!({ "success": true, "changed": changed })))
        }
    }
}

async fn delete_event(
    state: &AppState,
    actor: &Actor,
    event_id: Uuid,
    kind: EventKind,
) -> Result<(), ApiError> {
    let pool = &state.db.pool;
    let ctx = Context::new(actor, Utc::now());

    let ledger_entry = match kind {
        EventKind::Voting => {
            let event = voting::get_event(pool, event_id)
                .await?
                .ok_or(ErrorCode::NotFound)?;
            program::delete_event(&ctx, &event)?
        }
        EventKind::Petition => {
            let petition = petitions::get_petition(pool, event_id)
                .await?
                .ok_or(ErrorCode::NotFound)?;
            program::delete_event(&ctx, &petition)?
        }
    };

    let mut tx = pool.begin().await?;
    let removed = match kind {
        EventKind::Voting => voting::delete_event(&mut *tx, event_id).await?,
        EventKind::Petition => petitions::delete_petition(&mut *tx, event_id).await?,
    };
    if !removed {
        return Err(ErrorCode::NotFound.into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("{} {} deleted by {}", kind, event_id, actor.id);
    Ok(())
}

async fn change_status(
    state: &AppState,
    actor: &Actor,
    event_id: Uuid,
    kind: EventKind,
    next: EventStatus,
) -> Result<(), ApiError> {
    let pool = &state.db.pool;
    let ctx = Context::new(actor, Utc::now());

    let (current, ledger_entry) = match kind {
        EventKind::Voting => {
            let mut event = voting::get_event(pool, event_id)
                .await?
                .ok_or(ErrorCode::NotFound)?;
            let current = event.status;
            (current, program::change_status(&ctx, &mut event, next)?)
        }
        EventKind::Petition => {
            let mut petition = petitions::get_petition(pool, event_id)
                .await?
                .ok_or(ErrorCode::NotFound)?;
            let current = petition.status;
            (current, program::change_status(&ctx, &mut petition, next)?)
        }
    };

    let mut tx = pool.begin().await?;
    let updated = match kind {
        EventKind::Voting => voting::update_status(&mut *tx, event_id, current, next, ctx.now).await?,
        EventKind::Petition => {
            petitions::update_status(&mut *tx, event_id, current, next, ctx.now).await?
        }
    };
    // Someone else moved the event since it was read.
    if !updated {
        return Err(ErrorCode::InvalidStatusTransition {
            from: current,
            to: next,
        }
        .into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("{} {} moved {} -> {}", kind, event_id, current, next);
    Ok(())
}

/// Apply a grant or revoke to every target. Only effective changes are
/// recorded on the ledger. Returns the number of changed grants.
async fn update_roles(
    state: &AppState,
    actor: &Actor,
    targets: Vec<String>,
    role: Role,
    grant: bool,
) -> Result<usize, ApiError> {
    if targets.is_empty() {
        return Err(ErrorCode::BlankUserId.into());
    }

    let ctx = Context::new(actor, Utc::now());
    let mut entries = Vec::with_capacity(targets.len());
    for user_id in &targets {
        let entry = if grant {
            program::grant_role(&ctx, user_id, role)?
        } else {
            program::revoke_role(&ctx, user_id, role)?
        };
        entries.push((user_id.trim(), entry));
    }

    let mut changed = 0;
    let mut tx = state.db.pool.begin().await?;
    for (user_id, entry) in &entries {
        let applied = if grant {
            roles::grant(&mut *tx, user_id, role).await?
        } else {
            roles::revoke(&mut *tx, user_id, role).await?
        };
        if applied {
            ledger::append(&mut *tx, entry).await?;
            changed += 1;
        }
    }
    tx.commit().await?;

    info!(
        "{} {} {} of {} actor(s)",
        actor.id,
        if grant { "granted" } else { "revoked" },
        role,
        targets.len()
    );
    Ok(changed)
}
