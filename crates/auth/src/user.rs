//! User accounts as seen by the authentication boundary.

use serde::{Deserialize, Serialize};

use branchdesk_core::{BranchScope, UserId};

use crate::{Permissions, Role};

/// Stored account: identity, credentials and authorization attributes.
///
/// `email` is always kept in its normalized form (see [`normalize_email`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub branch: BranchScope,
    pub permissions: Permissions,
}

impl UserRecord {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            branch: self.branch,
            permissions: self.permissions,
        }
    }
}

/// Sanitized view of a user, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub branch: BranchScope,
    pub permissions: Permissions,
}

/// Read access to provisioned accounts.
///
/// Lookups are by normalized email; implementations must not require callers
/// to normalize first.
pub trait CredentialStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;
    fn list(&self) -> Vec<UserRecord>;
}

impl<S> CredentialStore for std::sync::Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        (**self).find_by_email(email)
    }

    fn list(&self) -> Vec<UserRecord> {
        (**self).list()
    }
}

/// Emails are matched case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
