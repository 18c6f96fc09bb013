use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::OnceCell;
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Action {
    IssueSession,
    CreateVotingEvent,
    CastVote,
    FinalizeVotingEvent,
    CreatePetition,
    SignPetition,
    FinalizePetition,
    Admin,
    CreateTemplate,
    UpdateTemplate,
    DeployContract,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::IssueSession => "issue_session",
            Action::CreateVotingEvent => "create_voting_event",
            Action::CastVote => "cast_vote",
            Action::FinalizeVotingEvent => "finalize_voting_event",
            Action::CreatePetition => "create_petition",
            Action::SignPetition => "sign_petition",
            Action::FinalizePetition => "finalize_petition",
            Action::Admin => "admin",
            Action::CreateTemplate => "create_template",
            Action::UpdateTemplate => "update_template",
            Action::DeployContract => "deploy_contract",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Success,
    BadRequest,
    Duplicate,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::BadRequest => "bad_request",
            Outcome::Duplicate => "duplicate",
            Outcome::Unauthorized => "unauthorized",
            Outcome::Forbidden => "forbidden",
            Outcome::NotFound => "not_found",
            Outcome::Internal => "internal",
        }
    }
}

#[derive(Default)]
pub struct Metrics {
    actions_total: HashMap<(Action, Outcome), u64>,
}

static METRICS: OnceCell<Mutex<Metrics>> = OnceCell::new();

fn get() -> &'static Mutex<Metrics> {
    METRICS.get_or_init(|| Mutex::new(Metrics::default()))
}

pub fn record_action(action: Action, outcome: Outcome) {
    let mut m = get().lock().unwrap_or_else(PoisonError::into_inner);
    *m.actions_total.entry((action, outcome)).or_insert(0) += 1;
}

pub fn action_count(action: Action, outcome: Outcome) -> u64 {
    let m = get().lock().unwrap_or_else(PoisonError::into_inner);
    m.actions_total.get(&(action, outcome)).copied().unwrap_or(0)
}

pub fn snapshot_as_json(db_path: &str) -> Value {
    let m = get().lock().unwrap_or_else(PoisonError::into_inner);

    let mut counters: Vec<(&(Action, Outcome), &u64)> = m.actions_total.iter().collect();
    counters.sort();
    let actions: Vec<Value> = counters
        .into_iter()
        .map(|((action, outcome), count)| {
            json!({
                "action": action.as_str(),
                "outcome": outcome.as_str(),
                "count": count,
            })
        })
        .collect();

    let db_bytes = std::fs::metadata(db_path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len());

    json!({
        "actions_total": actions,
        "storage": {
            "db_path": db_path,
            "db_size_mb": db_bytes.map(|b| round2(bytes_to_mb(b))),
            "free_storage_mb": filesystem_free_mb(db_path),
        }
    })
}

fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64) / (1024.0 * 1024.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn filesystem_free_mb(db_path: &str) -> Option<f64> {
    use sysinfo::Disks;

    let path = std::path::Path::new(db_path).canonicalize().ok()?;
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter(|d| path.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())
        .map(|d| round2(bytes_to_mb(d.available_space())))
}
