//! Types for HTTP requests and responses

use civic_ledger::{
    CreatePetition, CreateTemplate, CreateVotingEvent, DeployContract, EventKind, EventStatus,
    Role, TemplateUpdate, VoteChoice,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum VotingRequest {
    Create(CreateVotingEvent),
    Vote {
        voting_event_id: Uuid,
        vote_option: VoteChoice,
    },
    Finalize {
        voting_event_id: Uuid,
        results_reference: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum PetitionRequest {
    Create(CreatePetition),
    Sign {
        petition_id: Uuid,
        #[serde(default)]
        comment: Option<String>,
    },
    Finalize {
        petition_id: Uuid,
        results_reference: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum AdminRequest {
    Events,
    Participants {
        event_id: Uuid,
        event_type: EventKind,
    },
    Transactions,
    DeleteEvent {
        event_id: Uuid,
        event_type: EventKind,
    },
    ChangeStatus {
        event_id: Uuid,
        event_type: EventKind,
        status: EventStatus,
    },
    /// Grant to one actor (`userId`), a batch (`userIds`), or both.
    GrantRole {
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        user_ids: Vec<String>,
        role: Role,
    },
    RevokeRole {
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        user_ids: Vec<String>,
        role: Role,
    },
}

/// Merge the single and batch forms of a role target, single id first.
pub fn role_targets(user_id: Option<String>, user_ids: Vec<String>) -> Vec<String> {
    user_id.into_iter().chain(user_ids).collect()
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum TemplateRequest {
    CreateTemplate(CreateTemplate),
    UpdateTemplate {
        template_id: Uuid,
        updates: TemplateUpdate,
    },
    DeployContract {
        template_id: Uuid,
        #[serde(flatten)]
        args: DeployContract,
    },
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_in: u64,
}
