//! Authorization diagnostics.
//!
//! Unlike the business endpoints, these say *which* rule denied a request
//! (`BranchMismatch` vs `PermissionDenied`). They can be switched off with
//! `BRANCHDESK_DIAGNOSTICS=false`.

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use branchdesk_auth::{Action, explain_authorization};
use branchdesk_core::Branch;

use crate::app::dto::{self, BranchQuery, ExplainQuery};
use crate::app::errors::ApiError;
use crate::authz::{self, Disclosure};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/test-branch", get(test_branch))
        .route("/test-revenue-create", get(test_revenue_create))
        .route("/test-revenue-edit", get(test_revenue_edit))
        .route("/explain", get(explain))
}

fn allowed(caller: &CallerContext, branch: Option<Branch>, action: Action) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "allowed": true,
            "action": action,
            "branch": branch,
            "user": caller.email(),
        })),
    )
        .into_response()
}

/// GET /api/test-branch?branch_id=X
pub async fn test_branch(
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    let branch = dto::require_branch(dto::parse_branch(query.branch_id.as_deref())?)?;
    authz::guard(&caller, Some(branch), Action::ViewBranchData, Disclosure::Diagnostic)?;
    Ok(allowed(&caller, Some(branch), Action::ViewBranchData))
}

async fn check_action(
    caller: CallerContext,
    query: BranchQuery,
    action: Action,
) -> Result<Response, ApiError> {
    let requested = dto::parse_branch(query.branch_id.as_deref())?;
    let branch = authz::target_branch(&caller, requested);
    authz::guard(&caller, branch, action, Disclosure::Diagnostic)?;
    Ok(allowed(&caller, branch, action))
}

/// GET /api/test-revenue-create[?branch_id=X]
pub async fn test_revenue_create(
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    check_action(caller, query, Action::CreateRevenue).await
}

/// GET /api/test-revenue-edit[?branch_id=X]
pub async fn test_revenue_edit(
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    check_action(caller, query, Action::EditRevenue).await
}

/// GET /api/explain?action=X[&branch_id=Y] - why the caller would be
/// allowed or denied. Always 200 for well-formed queries.
pub async fn explain(
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<ExplainQuery>,
) -> Result<Response, ApiError> {
    let action = dto::parse_action(query.action.as_deref())?;
    let branch = dto::parse_branch(query.branch_id.as_deref())?;
    let explanation = explain_authorization(caller.principal(), branch, action);

    Ok((StatusCode::OK, Json(json!({ "explanation": explanation }))).into_response())
}
