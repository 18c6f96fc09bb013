//! HTTP error envelope

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use civic_ledger::{ErrorCode, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::metrics::Outcome;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error(transparent)]
    Domain(#[from] ErrorCode),
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    RouteDisabled,
    #[error("Storage unavailable")]
    Storage(#[source] sqlx::Error),
}

impl ApiError {
    /// Map an insert failure, treating a uniqueness violation as `duplicate`.
    pub fn from_insert(err: sqlx::Error, duplicate: ErrorCode) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::Domain(duplicate)
            }
            _ => ApiError::from(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Domain(code) => match code.kind() {
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation
                | ErrorKind::DuplicateParticipation
                | ErrorKind::NotYetEnded => StatusCode::BAD_REQUEST,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteDisabled => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ApiError::Unauthenticated(_) => Outcome::Unauthorized,
            ApiError::Domain(code) => match code.kind() {
                ErrorKind::Forbidden => Outcome::Forbidden,
                ErrorKind::NotFound => Outcome::NotFound,
                ErrorKind::DuplicateParticipation => Outcome::Duplicate,
                ErrorKind::Validation | ErrorKind::NotYetEnded => Outcome::BadRequest,
            },
            ApiError::BadRequest(_) => Outcome::BadRequest,
            ApiError::RouteDisabled => Outcome::NotFound,
            ApiError::Storage(_) => Outcome::Internal,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        error!("Storage error: {}", err);
        ApiError::Storage(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
