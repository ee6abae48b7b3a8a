//! API error types and helpers.
//!
//! # Purpose
//! Keeps error bodies uniform across policyd endpoints and maps engine and
//! admin failures onto HTTP status codes.
//!
//! # Security considerations
//! - Store failures are logged server-side; clients see a generic message.
//! - Forbidden responses name the operation but never the grants involved.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gatehouse_authz::{AdminError, EngineError, StoreError};

/// Structured API error returned by handlers.
///
/// `status` must match the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}

/// 500 from a failed store call; logs the underlying error.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "policyd storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// 503 when the engine could not reach the permission store in time.
pub fn api_store_unavailable(err: &EngineError) -> ApiError {
    tracing::error!(error = %err, "permission store unavailable");
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "store_unavailable",
        "permission store unavailable",
    )
}

pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Forbidden { operation, .. } => {
                api_forbidden(&format!("not permitted to perform {operation}"))
            }
            AdminError::Engine(err) => api_store_unavailable(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let unauthorized = api_unauthorized("nope");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.body.code, "unauthorized");

        let forbidden = api_forbidden("nope");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.body.code, "forbidden");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");
    }

    #[test]
    fn api_internal_wraps_store_error() {
        let err = StoreError::Unexpected(anyhow::anyhow!("boom"));
        let api = api_internal("storage failed", &err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.code, "internal");
        assert_eq!(api.body.message, "storage failed");
    }

    #[test]
    fn admin_errors_map_to_status() {
        let forbidden: ApiError = AdminError::Forbidden {
            role: "viewer".to_string(),
            operation: "permissions.roles.update".to_string(),
        }
        .into();
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert!(forbidden.body.message.contains("permissions.roles.update"));
        assert!(!forbidden.body.message.contains("viewer"));

        let timeout: ApiError = AdminError::Engine(EngineError::StoreTimeout {
            operation: "find_one_and_replace",
            timeout: Duration::from_millis(10),
        })
        .into();
        assert_eq!(timeout.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(timeout.body.code, "store_unavailable");
    }
}
