//! Unified API error handling
//!
//! This module provides a consistent error response format across all API
//! endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::service::audit::AuditServiceError;
use crate::service::chaingpt::ChainGptError;
use crate::service::explorer::ExplorerError;

/// Standard error response format
#[derive(Debug, Serialize)]
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
/// All API endpoints should return `Result<T, ApiError>` for consistent error
/// handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Contract source could not be resolved (422)
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Upstream AI/explorer error (502)
    #[error("Upstream service error: {0}")]
    UpstreamService(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    #[allow(dead_code)] // Reserved for failures outside the upstream clients
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SourceUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UpstreamService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::SourceUnavailable(_) => "source_unavailable",
            ApiError::UpstreamService(_) => "upstream_service_error",
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

impl From<AuditServiceError> for ApiError {
    fn from(err: AuditServiceError) -> Self {
        match err {
            AuditServiceError::MissingInput => ApiError::BadRequest(err.to_string()),
            AuditServiceError::SourceUnavailable(address) => {
                ApiError::SourceUnavailable(address)
            }
            AuditServiceError::Explorer(ExplorerError::NotAContract(address)) => {
                ApiError::BadRequest(format!("Address {address} is not a contract"))
            }
            AuditServiceError::Explorer(e) => ApiError::UpstreamService(e.to_string()),
            AuditServiceError::ChainGpt(e) => ApiError::UpstreamService(e.to_string()),
        }
    }
}

impl From<ChainGptError> for ApiError {
    fn from(err: ChainGptError) -> Self {
        ApiError::UpstreamService(err.to_string())
    }
}
