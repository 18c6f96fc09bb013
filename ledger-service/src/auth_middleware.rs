//! Bearer session authentication

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use civic_ledger::Actor;
use tracing::{debug, info};

use crate::database::roles;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the bearer session to an [`Actor`] with its current role grants and
/// hand it to the handler as a request extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let user_id = state.sessions.resolve(token).ok_or_else(|| {
        info!("Rejected unknown or expired session token");
        ApiError::Unauthenticated("Invalid or expired session")
    })?;

    let roles = roles::roles_for(&state.db.pool, &user_id).await?;
    debug!("Session for {} with roles {:?}", user_id, roles);

    request.extensions_mut().insert(Actor {
        id: user_id,
        roles,
    });
    Ok(next.run(request).await)
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(ApiError::Unauthenticated("No authorization header"))?
        .to_str()
        .map_err(|_| ApiError::Unauthenticated("Malformed authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthenticated("Expected a bearer token"))
}
