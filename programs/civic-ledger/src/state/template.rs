use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::ActorId;

/// What a template produces once deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Voting,
    Petition,
    Survey,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Voting => "voting",
            TemplateKind::Petition => "petition",
            TemplateKind::Survey => "survey",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "voting" => Ok(TemplateKind::Voting),
            "petition" => Ok(TemplateKind::Petition),
            "survey" => Ok(TemplateKind::Survey),
            other => Err(ErrorCode::InvalidTemplateKind(other.to_string())),
        }
    }
}

/// Reusable event configuration that contracts are deployed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub description: Option<String>,
    /// Free-form settings, always a JSON object.
    pub config: Value,
    pub created_by: ActorId,
    /// Inactive templates are hidden from listings and cannot be deployed.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Deployed,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Deployed => "deployed",
        }
    }
}

impl FromStr for DeploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "deployed" => Ok(DeploymentStatus::Deployed),
            other => Err(format!("unknown deployment status: {other}")),
        }
    }
}

/// Simulated contract instance created from a template. The address and block
/// number are random and refer to no real chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDeployment {
    pub id: Uuid,
    pub template_id: Uuid,
    /// `0x` followed by 40 hex digits.
    pub contract_address: String,
    pub network_id: String,
    pub deployer_id: ActorId,
    pub deployment_params: Value,
    pub block_number: u64,
    pub status: DeploymentStatus,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn validate_template_name(name: &str) -> Result<String> {
    let name = name.trim();
    require!(!name.is_empty(), ErrorCode::BlankTemplateName);
    Ok(name.to_string())
}

/// Missing config becomes `{}`; anything but an object is rejected.
pub(crate) fn normalize_config(config: Option<Value>) -> Result<Value> {
    match config {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(config @ Value::Object(_)) => Ok(config),
        Some(_) => Err(ErrorCode::InvalidTemplateConfig),
    }
}
