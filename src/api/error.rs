//! Unified API error handling
//!
//! This module provides a consistent error response format across all API
//! endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::repository::RepositoryError;
use crate::service::VerifyError;
use crate::store::StoreError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent
/// error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Job expired or never existed (404). Expected outcome, not a server
    /// fault: the client must re-upload.
    #[error("Unknown or expired job: {0}")]
    JobGone(String),

    /// Job id collision (409); job ids should be freshly minted
    #[error("Job already exists: {0}")]
    AlreadyExists(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Store connectivity failure (503, retryable)
    #[error("State store unavailable: {0}")]
    StoreUnavailable(String),

    /// Verifier collaborator failure (502)
    #[error("Verifier error: {0}")]
    Verifier(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::JobGone(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Verifier(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::JobGone(_) => "job_gone",
            ApiError::AlreadyExists(_) => "job_already_exists",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::StoreUnavailable(_) => "store_unavailable",
            ApiError::Verifier(_) => "verifier_error",
            ApiError::Internal(_) => "internal_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ApiError::JobGone(id),
            RepositoryError::AlreadyExists(id) => ApiError::AlreadyExists(id),
            RepositoryError::Store(e) => ApiError::StoreUnavailable(e.to_string()),
            // Duplicate claims are consumed inside the session controller;
            // one leaking here is a programming error.
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::JobGone(id) => ApiError::JobGone(id),
            VerifyError::Verifier(e) => ApiError::Verifier(e.to_string()),
            VerifyError::Repository(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreUnavailable(err.to_string())
    }
}
