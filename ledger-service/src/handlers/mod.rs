pub mod admin;
pub mod auth;
pub mod ledger_status;
pub mod petition;
pub mod system;
pub mod templates;
pub mod voting;

use std::future::Future;

use civic_ledger::ErrorCode;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics::{record_action, Action, Outcome};

/// Run an action and count its outcome.
pub(crate) async fn tracked<T>(
    action: Action,
    fut: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    let result = fut.await;
    match &result {
        Ok(_) => record_action(action, Outcome::Success),
        Err(err) => {
            warn!("{} rejected: {}", action.as_str(), err);
            record_action(action, err.outcome());
        }
    }
    result
}

/// Ids that do not parse cannot name an existing event.
pub(crate) fn parse_event_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ErrorCode::NotFound.into())
}
