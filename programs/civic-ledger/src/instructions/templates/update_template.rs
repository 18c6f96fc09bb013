use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{ErrorCode, Result},
    instructions::Context,
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    require,
    state::{
        normalize_config, validate_template_name, EventTemplate, LedgerEntry, LedgerEntryType,
        TemplateKind,
    },
};

/// Partial update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TemplateKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TemplateUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.description.is_none()
            && self.config.is_none()
            && self.is_active.is_none()
    }
}

pub fn handler(
    ctx: &Context,
    template: &mut EventTemplate,
    updates: TemplateUpdate,
) -> Result<LedgerEntry> {
    enforce(ctx.actor, Operation::ManageTemplates)?;
    require!(!updates.is_empty(), ErrorCode::EmptyTemplateUpdate);

    // Validate everything before touching the template.
    let name = updates
        .name
        .as_deref()
        .map(validate_template_name)
        .transpose()?;
    let config = match updates.config {
        Some(config) => Some(normalize_config(Some(config))?),
        None => None,
    };

    if let Some(name) = name {
        template.name = name;
    }
    if let Some(kind) = updates.kind {
        template.kind = kind;
    }
    if let Some(description) = updates.description {
        let description = description.trim();
        template.description = (!description.is_empty()).then(|| description.to_string());
    }
    if let Some(config) = config {
        template.config = config;
    }
    if let Some(is_active) = updates.is_active {
        template.is_active = is_active;
    }
    template.updated_at = ctx.now;
    log::debug!("template {} updated by {}", template.id, ctx.actor.id);

    Ok(simulate_ledger_entry(
        LedgerEntryType::TemplateUpdated,
        Some(template.id.to_string()),
        Some(&ctx.actor.id),
        json!({ "template_name": template.name, "is_active": template.is_active }),
        ctx.now,
    ))
}
