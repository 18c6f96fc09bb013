use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use civic_ledger::ErrorCode;
use tracing::info;

use super::tracked;
use crate::auth_middleware::extract_bearer_token;
use crate::error::ApiError;
use crate::metrics::Action;
use crate::state::AppState;
use crate::types::{SessionRequest, SessionResponse};
use crate::utils::tokens_match;

/// Mint a session for an authenticated identity. Only the configured issuer
/// may call this.
pub async fn issue_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    tracked(Action::IssueSession, async {
        let presented = extract_bearer_token(&headers)?;
        if !tokens_match(presented, &state.config.session_issuer_token) {
            return Err(ApiError::Unauthenticated("Invalid issuer token"));
        }

        let Json(request) = body?;
        let user_id = request.user_id.trim();
        if user_id.is_empty() {
            return Err(ErrorCode::BlankUserId.into());
        }

        let token = state.sessions.issue(user_id);
        info!("Issued session for {}", user_id);
        Ok(Json(SessionResponse {
            token,
            expires_in: state.sessions.ttl_seconds(),
        }))
    })
    .await
}
