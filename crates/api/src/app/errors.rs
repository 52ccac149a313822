use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use branchdesk_auth::AuthzError;
use branchdesk_core::DomainError;

/// Every failure a handler can return. Rendered as `{error, message}` JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing or invalid session token")]
    Unauthenticated,

    #[error("{0}")]
    BranchMismatch(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("forbidden")]
    Forbidden,

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    /// Detail is logged, never sent.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::BranchMismatch(_) | ApiError::PermissionDenied(_) | ApiError::Forbidden => {
                StatusCode::FORBIDDEN
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => "InvalidCredentials",
            ApiError::Unauthenticated => "Unauthenticated",
            ApiError::BranchMismatch(_) => "BranchMismatch",
            ApiError::PermissionDenied(_) => "PermissionDenied",
            ApiError::Forbidden => "Forbidden",
            ApiError::NotFound => "NotFound",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::Internal(_) => "Internal",
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::BranchMismatch { .. } => ApiError::BranchMismatch(err.to_string()),
            AuthzError::PermissionDenied(_) => ApiError::PermissionDenied(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ApiError::NotFound,
            DomainError::Validation(_) | DomainError::InvalidId(_) | DomainError::Conflict(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DomainError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        json_error(self.status(), self.code(), message)
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchdesk_auth::Capability;
    use branchdesk_core::{Branch, BranchScope};

    #[test]
    fn authz_errors_keep_their_kind() {
        let mismatch: ApiError = AuthzError::BranchMismatch {
            scope: BranchScope::Only(Branch::Tuwaiq),
            requested: Branch::Laban,
        }
        .into();
        assert_eq!(mismatch.status(), StatusCode::FORBIDDEN);
        assert_eq!(mismatch.code(), "BranchMismatch");

        let denied: ApiError = AuthzError::PermissionDenied(Capability::EditRevenues).into();
        assert_eq!(denied.code(), "PermissionDenied");
        assert!(denied.to_string().contains("edit-revenues"));
    }

    #[test]
    fn domain_errors_map_to_client_errors() {
        assert_eq!(ApiError::from(DomainError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(DomainError::validation("amount must be positive")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DomainError::storage("lock poisoned")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_rendered() {
        let res = ApiError::internal("db exploded at 0xdeadbeef").into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
