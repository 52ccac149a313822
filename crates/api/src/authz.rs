//! API-side authorization guard.
//!
//! Runs the pure policy from `branchdesk-auth` for the current caller and maps
//! denials to HTTP errors.

use branchdesk_auth::{Action, authorize, authorize_action};
use branchdesk_core::Branch;

use crate::app::errors::ApiError;
use crate::context::CallerContext;

/// How much a denial may reveal to the client.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Disclosure {
    /// Name the failing rule (`BranchMismatch` / `PermissionDenied`).
    Diagnostic,
    /// Always `Forbidden`.
    Opaque,
}

/// Branch a request targets: the one it names, else the caller's own branch.
///
/// `None` only for all-branch callers that named no branch.
pub fn target_branch(caller: &CallerContext, requested: Option<Branch>) -> Option<Branch> {
    requested.or_else(|| caller.home_branch())
}

/// Check `action` for the caller, against `branch` when one is targeted.
pub fn guard(
    caller: &CallerContext,
    branch: Option<Branch>,
    action: Action,
    disclosure: Disclosure,
) -> Result<(), ApiError> {
    let decision = match branch {
        Some(branch) => authorize(caller.principal(), branch, action),
        None => authorize_action(caller.principal(), action),
    };

    decision.map_err(|e| {
        tracing::info!(
            user = %caller.email(),
            scope = %caller.scope(),
            action = %action,
            branch = ?branch,
            reason = %e,
            "authorization denied"
        );
        match disclosure {
            Disclosure::Diagnostic => ApiError::from(e),
            Disclosure::Opaque => ApiError::Forbidden,
        }
    })
}
