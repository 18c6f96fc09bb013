use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCode, Result};
use crate::require;
use crate::state::LedgerEntryType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Active => "active",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Edges of the lifecycle state machine. Nothing returns to `active`
    /// except the initial publish out of `draft`.
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Draft, EventStatus::Active)
                | (EventStatus::Draft, EventStatus::Cancelled)
                | (EventStatus::Active, EventStatus::Completed)
                | (EventStatus::Active, EventStatus::Cancelled)
        )
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "active" => Ok(EventStatus::Active),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(ErrorCode::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Voting,
    Petition,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Voting => "voting",
            EventKind::Petition => "petition",
        }
    }

    pub fn created_entry_type(&self) -> LedgerEntryType {
        match self {
            EventKind::Voting => LedgerEntryType::VotingEventCreated,
            EventKind::Petition => LedgerEntryType::PetitionCreated,
        }
    }

    pub fn finalized_entry_type(&self) -> LedgerEntryType {
        match self {
            EventKind::Voting => LedgerEntryType::VotingEventFinalized,
            EventKind::Petition => LedgerEntryType::PetitionFinalized,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "voting" => Ok(EventKind::Voting),
            "petition" => Ok(EventKind::Petition),
            other => Err(ErrorCode::InvalidEventKind(other.to_string())),
        }
    }
}

/// Bounded participation window. `end_time` is always after `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        require!(end_time > start_time, ErrorCode::InvalidTimeRange);
        Ok(Self {
            start_time,
            end_time,
        })
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_time
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.has_started(now) && !self.has_ended(now)
    }
}

/// Shared lifecycle surface of voting events and petitions.
pub trait Lifecycle {
    const KIND: EventKind;

    fn id(&self) -> Uuid;
    fn created_by(&self) -> &str;
    fn window(&self) -> &TimeWindow;
    fn status(&self) -> EventStatus;
    fn set_status(&mut self, status: EventStatus, now: DateTime<Utc>);
    fn set_results_reference(&mut self, results_reference: String);
    /// Votes cast or signatures collected so far.
    fn participation_count(&self) -> u64;
}

pub(crate) fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    require!(!title.is_empty(), ErrorCode::BlankTitle);
    Ok(title.to_string())
}
