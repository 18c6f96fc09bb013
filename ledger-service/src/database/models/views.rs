//! API response view models

use civic_ledger::{
    query::{OptionTally, TimeRemaining},
    ContractDeployment, Petition, Signature, TemplateKind, Vote, VotingEvent,
};
use serde::Serialize;

/// A voting event with its per-option tally.
#[derive(Debug, Clone, Serialize)]
pub struct VotingEventDetail {
    pub event: VotingEvent,
    pub tally: Vec<OptionTally>,
    pub time_remaining: TimeRemaining,
}

/// A petition with its signature progress.
#[derive(Debug, Clone, Serialize)]
pub struct PetitionDetail {
    pub petition: Petition,
    pub progress_percent: f64,
    pub target_reached: bool,
    pub time_remaining: TimeRemaining,
}

/// Name and type of the template a deployment came from.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentListing {
    #[serde(flatten)]
    pub deployment: ContractDeployment,
    pub template: Option<TemplateSummary>,
}

/// Participation records of one event, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Participants {
    Votes(Vec<Vote>),
    Signatures(Vec<Signature>),
}
