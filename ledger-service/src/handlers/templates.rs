//! `/templates` routes
//!
//! Templates and their simulated deployments are admin-only, reads included.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use civic_ledger::{
    policy::{enforce, Operation},
    program, Actor, Context, CreateTemplate, DeployContract, ErrorCode, Receipt, TemplateUpdate,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::tracked;
use crate::database::{ledger, templates};
use crate::error::ApiError;
use crate::metrics::Action;
use crate::state::AppState;
use crate::types::TemplateRequest;

pub async fn list_templates(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Value>, ApiError> {
    enforce(&actor, Operation::ManageTemplates)?;
    let templates = templates::list_active_templates(&state.db.pool).await?;
    Ok(Json(json!({ "templates": templates })))
}

pub async fn list_deployments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Value>, ApiError> {
    enforce(&actor, Operation::ManageTemplates)?;
    let deployments = templates::list_deployments(&state.db.pool).await?;
    Ok(Json(json!({ "deployments": deployments })))
}

pub async fn post_templates(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<TemplateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    match request {
        TemplateRequest::CreateTemplate(args) => {
            tracked(Action::CreateTemplate, create_template(&state, &actor, args)).await
        }
        TemplateRequest::UpdateTemplate {
            template_id,
            updates,
        } => {
            tracked(
                Action::UpdateTemplate,
                update_template(&state, &actor, template_id, updates),
            )
            .await
        }
        TemplateRequest::DeployContract { template_id, args } => {
            tracked(
                Action::DeployContract,
                deploy_contract(&state, &actor, template_id, args),
            )
            .await
        }
    }
}

async fn create_template(
    state: &AppState,
    actor: &Actor,
    args: CreateTemplate,
) -> Result<Json<Value>, ApiError> {
    let ctx = Context::new(actor, Utc::now());
    let Receipt {
        record: template,
        ledger_entry,
    } = program::create_template(&ctx, args)?;

    let mut tx = state.db.pool.begin().await?;
    templates::insert_template(&mut *tx, &template).await?;
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Template created: {} ({})", template.id, template.kind);
    Ok(Json(json!({ "template": template })))
}

async fn update_template(
    state: &AppState,
    actor: &Actor,
    template_id: Uuid,
    updates: TemplateUpdate,
) -> Result<Json<Value>, ApiError> {
    let mut template = templates::get_template(&state.db.pool, template_id)
        .await?
        .ok_or(ErrorCode::TemplateNotFound)?;

    let ctx = Context::new(actor, Utc::now());
    let ledger_entry = program::update_template(&ctx, &mut template, updates)?;

    let mut tx = state.db.pool.begin().await?;
    if !templates::update_template(&mut *tx, &template).await? {
        return Err(ErrorCode::TemplateNotFound.into());
    }
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!("Template updated: {}", template.id);
    Ok(Json(json!({ "template": template })))
}

async fn deploy_contract(
    state: &AppState,
    actor: &Actor,
    template_id: Uuid,
    args: DeployContract,
) -> Result<Json<Value>, ApiError> {
    let template = templates::get_template(&state.db.pool, template_id)
        .await?
        .ok_or(ErrorCode::TemplateNotFound)?;

    let ctx = Context::new(actor, Utc::now());
    let Receipt {
        record: deployment,
        ledger_entry,
    } = program::deploy_contract(&ctx, &template, args)?;

    let mut tx = state.db.pool.begin().await?;
    templates::insert_deployment(&mut *tx, &deployment).await?;
    ledger::append(&mut *tx, &ledger_entry).await?;
    tx.commit().await?;

    info!(
        "Template {} deployed at {} on {}",
        template.id, deployment.contract_address, deployment.network_id
    );
    Ok(Json(json!({ "deployment": deployment })))
}
