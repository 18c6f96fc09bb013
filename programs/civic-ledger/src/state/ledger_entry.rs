use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    VotingEventCreated,
    VoteCast,
    VotingEventFinalized,
    PetitionCreated,
    PetitionSigned,
    PetitionFinalized,
    EventStatusChanged,
    EventDeleted,
    RoleGranted,
    RoleRevoked,
    TemplateCreated,
    TemplateUpdated,
    ContractDeployment,
}

impl LedgerEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryType::VotingEventCreated => "voting_event_created",
            LedgerEntryType::VoteCast => "vote_cast",
            LedgerEntryType::VotingEventFinalized => "voting_event_finalized",
            LedgerEntryType::PetitionCreated => "petition_created",
            LedgerEntryType::PetitionSigned => "petition_signed",
            LedgerEntryType::PetitionFinalized => "petition_finalized",
            LedgerEntryType::EventStatusChanged => "event_status_changed",
            LedgerEntryType::EventDeleted => "event_deleted",
            LedgerEntryType::RoleGranted => "role_granted",
            LedgerEntryType::RoleRevoked => "role_revoked",
            LedgerEntryType::TemplateCreated => "template_created",
            LedgerEntryType::TemplateUpdated => "template_updated",
            LedgerEntryType::ContractDeployment => "contract_deployment",
        }
    }
}

impl fmt::Display for LedgerEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerEntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry_type = match s {
            "voting_event_created" => LedgerEntryType::VotingEventCreated,
            "vote_cast" => LedgerEntryType::VoteCast,
            "voting_event_finalized" => LedgerEntryType::VotingEventFinalized,
            "petition_created" => LedgerEntryType::PetitionCreated,
            "petition_signed" => LedgerEntryType::PetitionSigned,
            "petition_finalized" => LedgerEntryType::PetitionFinalized,
            "event_status_changed" => LedgerEntryType::EventStatusChanged,
            "event_deleted" => LedgerEntryType::EventDeleted,
            "role_granted" => LedgerEntryType::RoleGranted,
            "role_revoked" => LedgerEntryType::RoleRevoked,
            "template_created" => LedgerEntryType::TemplateCreated,
            "template_updated" => LedgerEntryType::TemplateUpdated,
            "contract_deployment" => LedgerEntryType::ContractDeployment,
            other => return Err(format!("unknown ledger entry type: {other}")),
        };
        Ok(entry_type)
    }
}

/// Append-only audit record. Never updated or removed once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    /// Simulated transaction hash, `0x` followed by 64 hex digits.
    pub transaction_hash: String,
    pub transaction_type: LedgerEntryType,
    pub block_number: u64,
    pub related_id: Option<String>,
    pub user_id: Option<ActorId>,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
