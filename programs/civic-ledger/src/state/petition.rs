use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCode, Result};
use crate::state::{ActorId, EventKind, EventStatus, Lifecycle, TimeWindow};

/// Target used when the creator does not name one.
pub const DEFAULT_TARGET_SIGNATURES: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Petition {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub window: TimeWindow,
    /// Informational goal. Reaching it does not close the petition.
    pub target_signatures: NonZeroU32,
    pub current_signatures: u64,
    pub status: EventStatus,
    pub created_by: ActorId,
    pub blockchain_hash: Option<String>,
    pub results_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Petition {
    pub fn has_reached_target(&self) -> bool {
        self.current_signatures >= u64::from(self.target_signatures.get())
    }
}

impl Lifecycle for Petition {
    const KIND: EventKind = EventKind::Petition;

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
        self.current_signatures
    }
}

/// Validate a requested signature target. `None` falls back to the default.
pub fn validate_target(target_signatures: Option<i64>) -> Result<NonZeroU32> {
    let target = target_signatures.unwrap_or(i64::from(DEFAULT_TARGET_SIGNATURES));
    u32::try_from(target)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ErrorCode::InvalidTarget)
}
