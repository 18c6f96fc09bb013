use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    error::{ErrorCode, Result},
    instructions::{Context, Receipt},
    ledger::{simulate_contract_address, simulate_ledger_entry},
    policy::{enforce, Operation},
    require,
    state::{ContractDeployment, DeploymentStatus, EventTemplate, LedgerEntryType},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContract {
    pub network_id: String,
    #[serde(default)]
    pub contract_params: Option<Value>,
}

/// Record a simulated deployment of `template`. The deployment shares its
/// block number with the ledger entry that records it.
pub fn handler(
    ctx: &Context,
    template: &EventTemplate,
    args: DeployContract,
) -> Result<Receipt<ContractDeployment>> {
    enforce(ctx.actor, Operation::ManageTemplates)?;
    require!(template.is_active, ErrorCode::TemplateInactive);

    let network_id = args.network_id.trim().to_string();
    require!(!network_id.is_empty(), ErrorCode::BlankNetworkId);

    let contract_address = simulate_contract_address(&mut rand::thread_rng());
    let id = Uuid::new_v4();
    let ledger_entry = simulate_ledger_entry(
        LedgerEntryType::ContractDeployment,
        Some(id.to_string()),
        Some(&ctx.actor.id),
        json!({
            "template_type": template.kind,
            "contract_address": contract_address,
            "network_id": network_id,
        }),
        ctx.now,
    );

    let deployment = ContractDeployment {
        id,
        template_id: template.id,
        contract_address,
        network_id,
        deployer_id: ctx.actor.id.clone(),
        deployment_params: args
            .contract_params
            .unwrap_or_else(|| Value::Object(Map::new())),
        block_number: ledger_entry.block_number,
        status: DeploymentStatus::Deployed,
        created_at: ctx.now,
    };
    log::debug!(
        "template {} deployed at {} on {}",
        template.id,
        deployment.contract_address,
        deployment.network_id
    );

    Ok(Receipt {
        record: deployment,
        ledger_entry,
    })
}
