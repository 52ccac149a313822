use branchdesk_core::{Branch, BranchScope, UserId};

use crate::{Permissions, Role, UserRecord};

/// A fully resolved caller for authorization decisions.
///
/// Built per request from the stored account the session token points at;
/// nothing here is taken from the token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub scope: BranchScope,
    pub permissions: Permissions,
}

impl Principal {
    pub fn home_branch(&self) -> Option<Branch> {
        self.scope.home_branch()
    }
}

impl From<&UserRecord> for Principal {
    fn from(record: &UserRecord) -> Self {
        Self {
            user_id: record.id,
            email: record.email.clone(),
            role: record.role,
            scope: record.branch,
            permissions: record.permissions,
        }
    }
}
