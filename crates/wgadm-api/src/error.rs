//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use wgadm_core::ApplianceError;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized (no appliance session)
    Unauthorized(String),
    /// 404 Not Found
    NotFound(String),
    /// 502 Bad Gateway (appliance rejected or garbled the call)
    BadGateway(String),
    /// 503 Service Unavailable (appliance unreachable)
    ServiceUnavailable(String),
    /// 504 Gateway Timeout
    GatewayTimeout(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "gateway_timeout", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<ApplianceError> for ApiError {
    fn from(err: ApplianceError) -> Self {
        match err {
            ApplianceError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            ApplianceError::NotFound(msg) => ApiError::NotFound(msg),
            ApplianceError::Transport(msg) => ApiError::ServiceUnavailable(msg),
            ApplianceError::Serialization(msg) => ApiError::BadGateway(msg),
            ApplianceError::Upstream { status, body } => {
                ApiError::BadGateway(format!("appliance returned status {}: {}", status, body))
            }
            ApplianceError::Timeout => {
                ApiError::GatewayTimeout("appliance request timed out".to_string())
            }
        }
    }
}
