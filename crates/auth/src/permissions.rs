use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named boolean capability.
///
/// Wire names are kebab-case (e.g. `"edit-revenues"`), matching the field
/// names of [`Permissions`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    ViewRevenues,
    EditRevenues,
    ViewExpenses,
    EditExpenses,
    ViewBonus,
    EditBonus,
    ViewReports,
    ManageUsers,
    ManageRequests,
    CreateRequests,
    ApproveRequests,
    ManageProducts,
}

impl Capability {
    pub const ALL: [Capability; 12] = [
        Capability::ViewRevenues,
        Capability::EditRevenues,
        Capability::ViewExpenses,
        Capability::EditExpenses,
        Capability::ViewBonus,
        Capability::EditBonus,
        Capability::ViewReports,
        Capability::ManageUsers,
        Capability::ManageRequests,
        Capability::CreateRequests,
        Capability::ApproveRequests,
        Capability::ManageProducts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewRevenues => "view-revenues",
            Capability::EditRevenues => "edit-revenues",
            Capability::ViewExpenses => "view-expenses",
            Capability::EditExpenses => "edit-expenses",
            Capability::ViewBonus => "view-bonus",
            Capability::EditBonus => "edit-bonus",
            Capability::ViewReports => "view-reports",
            Capability::ManageUsers => "manage-users",
            Capability::ManageRequests => "manage-requests",
            Capability::CreateRequests => "create-requests",
            Capability::ApproveRequests => "approve-requests",
            Capability::ManageProducts => "manage-products",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown capability '{s}'"))
    }
}

/// Fixed-field permission record attached to every user.
///
/// Absent fields deserialize as `false`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Permissions {
    pub view_revenues: bool,
    pub edit_revenues: bool,
    pub view_expenses: bool,
    pub edit_expenses: bool,
    pub view_bonus: bool,
    pub edit_bonus: bool,
    pub view_reports: bool,
    pub manage_users: bool,
    pub manage_requests: bool,
    pub create_requests: bool,
    pub approve_requests: bool,
    pub manage_products: bool,
}

impl Permissions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            view_revenues: true,
            edit_revenues: true,
            view_expenses: true,
            edit_expenses: true,
            view_bonus: true,
            edit_bonus: true,
            view_reports: true,
            manage_users: true,
            manage_requests: true,
            create_requests: true,
            approve_requests: true,
            manage_products: true,
        }
    }

    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewRevenues => self.view_revenues,
            Capability::EditRevenues => self.edit_revenues,
            Capability::ViewExpenses => self.view_expenses,
            Capability::EditExpenses => self.edit_expenses,
            Capability::ViewBonus => self.view_bonus,
            Capability::EditBonus => self.edit_bonus,
            Capability::ViewReports => self.view_reports,
            Capability::ManageUsers => self.manage_users,
            Capability::ManageRequests => self.manage_requests,
            Capability::CreateRequests => self.create_requests,
            Capability::ApproveRequests => self.approve_requests,
            Capability::ManageProducts => self.manage_products,
        }
    }

    /// Granted capabilities, in declaration order.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.grants(*c))
            .collect()
    }
}
