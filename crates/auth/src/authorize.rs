use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use branchdesk_core::{Branch, BranchScope};

use crate::{Capability, Principal, Role};

/// Something a caller asks to do.
///
/// Each action is gated by exactly one [`Capability`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ViewBranchData,
    ViewRevenues,
    CreateRevenue,
    EditRevenue,
    ViewExpenses,
    CreateExpense,
    EditExpense,
    ManageUsers,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::ViewBranchData,
        Action::ViewRevenues,
        Action::CreateRevenue,
        Action::EditRevenue,
        Action::ViewExpenses,
        Action::CreateExpense,
        Action::EditExpense,
        Action::ManageUsers,
    ];

    pub fn required_capability(&self) -> Capability {
        match self {
            Action::ViewBranchData => Capability::ViewReports,
            Action::ViewRevenues => Capability::ViewRevenues,
            Action::CreateRevenue | Action::EditRevenue => Capability::EditRevenues,
            Action::ViewExpenses => Capability::ViewExpenses,
            Action::CreateExpense | Action::EditExpense => Capability::EditExpenses,
            Action::ManageUsers => Capability::ManageUsers,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewBranchData => "view-branch-data",
            Action::ViewRevenues => "view-revenues",
            Action::CreateRevenue => "create-revenue",
            Action::EditRevenue => "edit-revenue",
            Action::ViewExpenses => "view-expenses",
            Action::CreateExpense => "create-expense",
            Action::EditExpense => "edit-expense",
            Action::ManageUsers => "manage-users",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("branch mismatch: scope '{scope}' does not cover branch '{requested}'")]
    BranchMismatch { scope: BranchScope, requested: Branch },

    #[error("permission denied: missing capability '{0}'")]
    PermissionDenied(Capability),
}

impl AuthzError {
    pub fn kind(&self) -> DenialKind {
        match self {
            AuthzError::BranchMismatch { .. } => DenialKind::BranchMismatch,
            AuthzError::PermissionDenied(_) => DenialKind::PermissionDenied,
        }
    }
}

/// Authorize a principal to perform `action` against `branch`.
///
/// Branch scope is checked first, then the action's capability.
///
/// - No IO
/// - No panics
/// - Same inputs, same answer
pub fn authorize(principal: &Principal, branch: Branch, action: Action) -> Result<(), AuthzError> {
    if !principal.scope.covers(branch) {
        return Err(AuthzError::BranchMismatch {
            scope: principal.scope,
            requested: branch,
        });
    }

    authorize_action(principal, action)
}

/// Permission rule alone, for requests that name no branch.
pub fn authorize_action(principal: &Principal, action: Action) -> Result<(), AuthzError> {
    let capability = action.required_capability();
    if principal.permissions.grants(capability) {
        Ok(())
    } else {
        Err(AuthzError::PermissionDenied(capability))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DenialKind {
    BranchMismatch,
    PermissionDenied,
}

/// Debuggable account of one authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub action: Action,
    pub required_capability: Capability,
    pub requested_branch: Option<Branch>,
    pub granted: bool,
    pub reason: String,
    pub denial: Option<DenialKind>,
    pub role: Role,
    pub scope: BranchScope,
    pub granted_capabilities: Vec<Capability>,
}

/// Explain why [`authorize`] (or [`authorize_action`] when `branch` is `None`)
/// allows or denies a request.
pub fn explain_authorization(
    principal: &Principal,
    branch: Option<Branch>,
    action: Action,
) -> AuthorizationExplanation {
    let decision = match branch {
        Some(branch) => authorize(principal, branch, action),
        None => authorize_action(principal, action),
    };

    let reason = match &decision {
        Ok(()) => match branch {
            Some(branch) => format!(
                "scope '{}' covers branch '{}' and capability '{}' is granted",
                principal.scope,
                branch,
                action.required_capability()
            ),
            None => format!("capability '{}' is granted", action.required_capability()),
        },
        Err(e) => e.to_string(),
    };

    AuthorizationExplanation {
        action,
        required_capability: action.required_capability(),
        requested_branch: branch,
        granted: decision.is_ok(),
        reason,
        denial: decision.err().map(|e| e.kind()),
        role: principal.role,
        scope: principal.scope,
        granted_capabilities: principal.permissions.granted(),
    }
}
