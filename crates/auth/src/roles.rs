use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Permissions;

/// Organizational role of a user.
///
/// A role does not grant anything by itself: the guard only looks at the
/// user's [`Permissions`]. Roles pick the default permission profile handed
/// out when an account is provisioned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Admin,
    Supervisor,
    Employee,
    Partner,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Supervisor, Role::Employee, Role::Partner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
            Role::Partner => "partner",
        }
    }

    /// Permission profile assigned at account creation.
    pub fn default_permissions(&self) -> Permissions {
        match self {
            Role::Admin => Permissions::all(),
            Role::Supervisor => Permissions {
                view_revenues: true,
                edit_revenues: true,
                view_expenses: true,
                edit_expenses: true,
                view_bonus: true,
                view_reports: true,
                manage_requests: true,
                create_requests: true,
                approve_requests: true,
                ..Permissions::none()
            },
            Role::Employee => Permissions {
                create_requests: true,
                ..Permissions::none()
            },
            Role::Partner => Permissions {
                view_revenues: true,
                view_expenses: true,
                view_bonus: true,
                view_reports: true,
                ..Permissions::none()
            },
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "supervisor" | "manager" => Ok(Role::Supervisor),
            "employee" => Ok(Role::Employee),
            "partner" => Ok(Role::Partner),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}
