use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use branchdesk_auth::{Action, CredentialStore, UserProfile};
use branchdesk_core::BranchScope;

use crate::app::dto::{self, BranchQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::{self, Disclosure};
use crate::context::CallerContext;

/// GET /api/users[?branch_id=] - accounts pinned to a branch, or every
/// account for headquarters callers that name no branch.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    let requested = dto::parse_branch(query.branch_id.as_deref())?;
    let branch = authz::target_branch(&caller, requested);
    authz::guard(&caller, branch, Action::ManageUsers, Disclosure::Opaque)?;

    let users: Vec<UserProfile> = services
        .users
        .list()
        .into_iter()
        .filter(|u| match branch {
            Some(b) => u.branch == BranchScope::Only(b),
            None => true,
        })
        .map(|u| u.profile())
        .collect();

    Ok((StatusCode::OK, Json(json!({ "branch": branch, "users": users }))).into_response())
}
