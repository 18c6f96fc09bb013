//! Store operations for event templates and contract deployments

use std::str::FromStr;

use civic_ledger::{ContractDeployment, EventTemplate, TemplateKind};
use sqlx::{sqlite::SqliteExecutor, Row};
use tracing::debug;
use uuid::Uuid;

use super::models::views::{DeploymentListing, TemplateSummary};
use super::models::{deployment_from_row, template_from_row};
use super::sql::{
    INSERT_DEPLOYMENT_SQL, INSERT_TEMPLATE_SQL, SELECT_ACTIVE_TEMPLATES_SQL,
    SELECT_DEPLOYMENTS_SQL, SELECT_TEMPLATE_SQL, UPDATE_TEMPLATE_SQL,
};

fn json_text(value: &serde_json::Value, column: &str) -> sqlx::Result<String> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Protocol(format!("{column}: {e}")))
}

pub async fn insert_template<'c>(
    executor: impl SqliteExecutor<'c>,
    template: &EventTemplate,
) -> sqlx::Result<()> {
    debug!("Inserting template {}", template.id);
    sqlx::query(INSERT_TEMPLATE_SQL)
        .bind(template.id.to_string())
        .bind(&template.name)
        .bind(template.kind.as_str())
        .bind(&template.description)
        .bind(json_text(&template.config, "config")?)
        .bind(&template.created_by)
        .bind(template.is_active)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_template<'c>(
    executor: impl SqliteExecutor<'c>,
    id: Uuid,
) -> sqlx::Result<Option<EventTemplate>> {
    sqlx::query(SELECT_TEMPLATE_SQL)
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .map(|row| template_from_row(&row))
        .transpose()
}

/// Active templates, newest first.
pub async fn list_active_templates<'c>(
    executor: impl SqliteExecutor<'c>,
) -> sqlx::Result<Vec<EventTemplate>> {
    let rows = sqlx::query(SELECT_ACTIVE_TEMPLATES_SQL)
        .fetch_all(executor)
        .await?;
    rows.iter().map(template_from_row).collect()
}

/// Overwrite the mutable columns. Returns false if the template is gone.
pub async fn update_template<'c>(
    executor: impl SqliteExecutor<'c>,
    template: &EventTemplate,
) -> sqlx::Result<bool> {
    let result = sqlx::query(UPDATE_TEMPLATE_SQL)
        .bind(&template.name)
        .bind(template.kind.as_str())
        .bind(&template.description)
        .bind(json_text(&template.config, "config")?)
        .bind(template.is_active)
        .bind(template.updated_at)
        .bind(template.id.to_string())
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn insert_deployment<'c>(
    executor: impl SqliteExecutor<'c>,
    deployment: &ContractDeployment,
) -> sqlx::Result<()> {
    debug!(
        "Inserting deployment {} of template {}",
        deployment.id, deployment.template_id
    );
    sqlx::query(INSERT_DEPLOYMENT_SQL)
        .bind(deployment.id.to_string())
        .bind(deployment.template_id.to_string())
        .bind(&deployment.contract_address)
        .bind(&deployment.network_id)
        .bind(&deployment.deployer_id)
        .bind(json_text(&deployment.deployment_params, "deployment_params")?)
        .bind(deployment.block_number as i64)
        .bind(deployment.status.as_str())
        .bind(deployment.created_at)
        .execute(executor)
        .await?;
    Ok(())
}

/// All deployments, newest first, each with a summary of its template.
pub async fn list_deployments<'c>(
    executor: impl SqliteExecutor<'c>,
) -> sqlx::Result<Vec<DeploymentListing>> {
    let rows = sqlx::query(SELECT_DEPLOYMENTS_SQL)
        .fetch_all(executor)
        .await?;

    rows.iter()
        .map(|row| {
            let name: Option<String> = row.try_get("template_name")?;
            let kind: Option<String> = row.try_get("template_type")?;
            let template = match (name, kind) {
                (Some(name), Some(kind)) => Some(TemplateSummary {
                    name,
                    kind: TemplateKind::from_str(&kind)
                        .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?,
                    description: row.try_get("template_description")?,
                }),
                _ => None,
            };
            Ok(DeploymentListing {
                deployment: deployment_from_row(row)?,
                template,
            })
        })
        .collect()
}
