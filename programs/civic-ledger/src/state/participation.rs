use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::ActorId;

/// One actor's vote on one voting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub voting_event_id: Uuid,
    pub user_id: ActorId,
    /// Text of the chosen option.
    pub vote_option: String,
    /// Position of the chosen option in the event's option list.
    pub option_index: u32,
    pub blockchain_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One actor's signature on one petition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub id: Uuid,
    pub petition_id: Uuid,
    pub user_id: ActorId,
    pub comment: Option<String>,
    pub blockchain_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}
