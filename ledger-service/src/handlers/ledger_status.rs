use axum::{extract::State, Json};
use civic_ledger::ledger::{ledger_status, LedgerStatus, RECENT_ENTRIES};

use crate::database::ledger;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_ledger_status(State(state): State<AppState>) -> Result<Json<LedgerStatus>, ApiError> {
    let recent = ledger::recent(&state.db.pool, RECENT_ENTRIES as i64).await?;
    let total = ledger::count(&state.db.pool).await?;
    Ok(Json(ledger_status(&recent, total)))
}
