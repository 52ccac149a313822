use branchdesk_auth::Principal;
use branchdesk_core::{Branch, BranchScope};

/// Authenticated caller for a request.
///
/// Inserted by the auth middleware after the session token has been resolved
/// to a live account; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    principal: Principal,
}

impl CallerContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn email(&self) -> &str {
        &self.principal.email
    }

    pub fn scope(&self) -> BranchScope {
        self.principal.scope
    }

    pub fn home_branch(&self) -> Option<Branch> {
        self.principal.home_branch()
    }
}
