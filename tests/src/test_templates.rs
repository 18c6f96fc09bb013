use chrono::{Duration, Utc};
use civic_ledger::{
    CreateTemplate, DeployContract, ErrorCode, LedgerEntryType, TemplateKind, TemplateUpdate,
};
use serde_json::json;

use crate::utils::{
    assert::assert_error_code, data_types::setup_context, fetch_utils::fetch_entries_of_type,
};

fn petition_template() -> CreateTemplate {
    CreateTemplate {
        name: "Neighbourhood petition".into(),
        kind: TemplateKind::Petition,
        description: Some("Standard 100-signature petition".into()),
        config: Some(json!({ "target_signatures": 100 })),
    }
}

fn sepolia() -> DeployContract {
    DeployContract {
        network_id: "sepolia".into(),
        contract_params: None,
    }
}

#[test]
fn test_template_admin_only() {
    let mut context = setup_context(Utc::now(), 1, 1);
    let admin = context.admin.clone();
    let voter = context.voters[0].clone();
    let petitioner = context.petitioners[0].clone();
    let ledger = &mut context.ledger;

    assert_error_code(
        ledger.send_create_template(&petitioner, petition_template()),
        ErrorCode::Forbidden,
    );
    let template = ledger.send_create_template(&admin, petition_template()).unwrap();
    assert_error_code(
        ledger.send_update_template(
            &voter,
            template.id,
            TemplateUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        ),
        ErrorCode::Forbidden,
    );
    assert_error_code(
        ledger.send_deploy_contract(&voter, template.id, sepolia()),
        ErrorCode::Forbidden,
    );
    assert!(ledger.deployments.is_empty());
}

#[test]
fn test_template_update_and_deploy() {
    let mut context = setup_context(Utc::now(), 0, 0);
    let admin = context.admin.clone();
    let ledger = &mut context.ledger;

    let template = ledger.send_create_template(&admin, petition_template()).unwrap();
    assert!(template.is_active);
    assert_eq!(template.created_by, admin);

    // A rejected update leaves the template untouched
    assert_error_code(
        ledger.send_update_template(&admin, template.id, TemplateUpdate::default()),
        ErrorCode::EmptyTemplateUpdate,
    );
    assert_error_code(
        ledger.send_update_template(
            &admin,
            template.id,
            TemplateUpdate {
                name: Some("Renamed".into()),
                config: Some(json!("not an object")),
                ..Default::default()
            },
        ),
        ErrorCode::InvalidTemplateConfig,
    );
    assert_eq!(ledger.templates[&template.id], template);

    ledger.advance(Duration::minutes(5));
    let updated = ledger
        .send_update_template(
            &admin,
            template.id,
            TemplateUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(updated.updated_at, template.created_at + Duration::minutes(5));
    assert!(ledger.active_templates().is_empty());

    assert_error_code(
        ledger.send_deploy_contract(&admin, template.id, sepolia()),
        ErrorCode::TemplateInactive,
    );

    ledger
        .send_update_template(
            &admin,
            template.id,
            TemplateUpdate {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_error_code(
        ledger.send_deploy_contract(
            &admin,
            template.id,
            DeployContract {
                network_id: "   ".into(),
                contract_params: None,
            },
        ),
        ErrorCode::BlankNetworkId,
    );

    let deployment = ledger
        .send_deploy_contract(
            &admin,
            template.id,
            DeployContract {
                network_id: "sepolia".into(),
                contract_params: Some(json!({ "ward": 3 })),
            },
        )
        .unwrap();
    assert_eq!(deployment.template_id, template.id);
    assert_eq!(deployment.deployer_id, admin);
    assert_eq!(deployment.deployment_params, json!({ "ward": 3 }));

    let deploys = fetch_entries_of_type(ledger, LedgerEntryType::ContractDeployment);
    assert_eq!(deploys.len(), 1);
    assert_eq!(deploys[0].block_number, deployment.block_number);
    assert_eq!(deploys[0].data["contract_address"], deployment.contract_address);
    assert_eq!(deploys[0].data["template_type"], "petition");

    assert_eq!(
        fetch_entries_of_type(ledger, LedgerEntryType::TemplateCreated).len(),
        1
    );
    assert_eq!(
        fetch_entries_of_type(ledger, LedgerEntryType::TemplateUpdated).len(),
        2
    );
}

#[test]
fn test_unknown_template() {
    let mut context = setup_context(Utc::now(), 0, 0);
    let admin = context.admin.clone();
    assert_error_code(
        context
            .ledger
            .send_deploy_contract(&admin, uuid::Uuid::new_v4(), sepolia()),
        ErrorCode::TemplateNotFound,
    );
}
