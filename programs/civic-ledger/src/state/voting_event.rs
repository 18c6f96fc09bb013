use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::{ActorId, EventKind, EventStatus, Lifecycle, TimeWindow};

pub const MIN_VOTING_OPTIONS: usize = 2;
pub const MAX_VOTING_OPTIONS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Declared options in display order. Votes refer to them by position.
    pub options: Vec<String>,
    #[serde(flatten)]
    pub window: TimeWindow,
    pub status: EventStatus,
    pub created_by: ActorId,
    pub total_votes: u64,
    pub blockchain_hash: Option<String>,
    pub results_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A voter's pick, given either as a position in the option list or as the
/// option text itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoteChoice {
    Index(usize),
    Value(String),
}

impl VotingEvent {
    /// Resolve a choice to the index of a declared option.
    pub fn option_index(&self, choice: &VoteChoice) -> Option<usize> {
        match choice {
            VoteChoice::Index(index) => (*index < self.options.len()).then_some(*index),
            VoteChoice::Value(value) => {
                let value = value.trim();
                self.options.iter().position(|option| option == value)
            }
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status == EventStatus::Completed
    }
}

impl Lifecycle for VotingEvent {
    const KIND: EventKind = EventKind::Voting;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_by(&self) -> &str {
        &self.created_by
    }

    fn window(&self) -> &TimeWindow {
        &self.window
    }

    fn status(&self) -> EventStatus {
        self.status
    }

    fn set_status(&mut self, status: EventStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    fn set_results_reference(&mut self, results_reference: String) {
        self.results_reference = Some(results_reference);
    }

    fn participation_count(&self) -> u64 {
        self.total_votes
    }
}

/// Trim options, drop repeats (first occurrence wins) and check the count.
pub fn normalize_options(options: Vec<String>) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(options.len());
    for option in options {
        let option = option.trim();
        require!(!option.is_empty(), ErrorCode::BlankOption);
        if !normalized.iter().any(|existing| existing == option) {
            normalized.push(option.to_string());
        }
    }

    require!(
        normalized.len() >= MIN_VOTING_OPTIONS,
        ErrorCode::InsufficientOptions
    );
    require!(
        normalized.len() <= MAX_VOTING_OPTIONS,
        ErrorCode::TooManyOptions
    );
    Ok(normalized)
}
