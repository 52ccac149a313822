use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use branchdesk_auth::{AuthError, CredentialStore};

use crate::app::dto::{LoginRequest, LoginResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

/// POST /api/login
///
/// Failures never say whether the email exists.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let svc = services.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        svc.authenticator.login(&body.email, &body.password, Utc::now())
    })
    .await
    .map_err(|e| ApiError::internal(format!("login task failed: {e}")))?;

    match outcome {
        Ok(success) => {
            tracing::info!(
                user = %success.user.email,
                role = %success.user.role,
                scope = %success.user.branch,
                "login succeeded"
            );
            Ok((
                StatusCode::OK,
                Json(LoginResponse {
                    success: true,
                    token: success.token,
                    user: success.user,
                }),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("login rejected");
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "error": ApiError::InvalidCredentials.code(),
                })),
            )
                .into_response())
        }
        Err(AuthError::Token(e)) => Err(ApiError::internal(e.to_string())),
    }
}

/// GET /api/me - profile of the authenticated caller
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Response, ApiError> {
    let user = services
        .users
        .find_by_email(caller.email())
        .ok_or(ApiError::Unauthenticated)?;

    Ok((StatusCode::OK, Json(user.profile())).into_response())
}
