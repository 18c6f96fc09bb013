use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::Result,
    instructions::{Context, Receipt},
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    state::{normalize_config, validate_template_name, EventTemplate, LedgerEntryType, TemplateKind},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
}

pub fn handler(ctx: &Context, args: CreateTemplate) -> Result<Receipt<EventTemplate>> {
    enforce(ctx.actor, Operation::ManageTemplates)?;

    let name = validate_template_name(&args.name)?;
    let config = normalize_config(args.config)?;

    let id = Uuid::new_v4();
    let ledger_entry = simulate_ledger_entry(
        LedgerEntryType::TemplateCreated,
        Some(id.to_string()),
        Some(&ctx.actor.id),
        json!({ "template_name": name, "template_type": args.kind }),
        ctx.now,
    );

    let template = EventTemplate {
        id,
        name,
        kind: args.kind,
        description: args
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        config,
        created_by: ctx.actor.id.clone(),
        is_active: true,
        created_at: ctx.now,
        updated_at: ctx.now,
    };
    log::debug!("template {} ({}) created by {}", template.id, template.kind, template.created_by);

    Ok(Receipt {
        record: template,
        ledger_entry,
    })
}
