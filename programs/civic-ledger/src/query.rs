//! Read-side figures derived from events and their participation records.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Petition, TimeWindow, Vote, VotingEvent};

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub total_seconds: i64,
}

impl TimeRemaining {
    pub fn is_over(&self) -> bool {
        self.total_seconds == 0
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h", self.days, self.hours)
    }
}

/// Time left until the window closes, clamped at zero.
pub fn time_remaining(window: &TimeWindow, now: DateTime<Utc>) -> TimeRemaining {
    let total_seconds = (window.end_time - now).num_seconds().max(0);
    TimeRemaining {
        days: total_seconds / SECONDS_PER_DAY,
        hours: (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
        total_seconds,
    }
}

/// Signature progress as a percentage of the target, saturating at 100.
pub fn progress_percent(current_signatures: u64, target_signatures: NonZeroU32) -> f64 {
    let ratio = current_signatures as f64 / f64::from(target_signatures.get());
    (ratio * 100.0).min(100.0)
}

pub fn petition_progress(petition: &Petition) -> f64 {
    progress_percent(petition.current_signatures, petition.target_signatures)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTally {
    pub index: u32,
    pub option: String,
    pub tally: u64,
}

/// Count votes per declared option, in option order. Votes that point at an
/// undeclared index are ignored.
pub fn tally(event: &VotingEvent, votes: &[Vote]) -> Vec<OptionTally> {
    let mut tallies: Vec<OptionTally> = event
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| OptionTally {
            index: index as u32,
            option: option.clone(),
            tally: 0,
        })
        .collect();

    for vote in votes.iter().filter(|v| v.voting_event_id == event.id) {
        if let Some(entry) = tallies.get_mut(vote.option_index as usize) {
            entry.tally += 1;
        }
    }
    tallies
}

pub fn tally_total(tallies: &[OptionTally]) -> u64 {
    tallies.iter().map(|t| t.tally).sum()
}
