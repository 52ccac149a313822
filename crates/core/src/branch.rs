//! Branches and branch scopes.
//!
//! The organization runs a fixed, small set of branches. Every user is scoped
//! either to exactly one of them or to all of them (headquarters).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A physical branch of the organization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Branch {
    Laban,
    Tuwaiq,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::Laban, Branch::Tuwaiq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Laban => "laban",
            Branch::Tuwaiq => "tuwaiq",
        }
    }
}

impl core::fmt::Display for Branch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "laban" => Ok(Branch::Laban),
            "tuwaiq" => Ok(Branch::Tuwaiq),
            other => Err(DomainError::invalid_id(format!("unknown branch '{other}'"))),
        }
    }
}

impl TryFrom<String> for Branch {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Branch> for String {
    fn from(value: Branch) -> Self {
        value.as_str().to_string()
    }
}

/// Which branches a user may act within.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BranchScope {
    /// Headquarters: every branch.
    All,
    /// A single branch.
    Only(Branch),
}

impl BranchScope {
    pub fn covers(&self, branch: Branch) -> bool {
        match self {
            BranchScope::All => true,
            BranchScope::Only(own) => *own == branch,
        }
    }

    /// The branch this scope is pinned to, if it is a single-branch scope.
    pub fn home_branch(&self) -> Option<Branch> {
        match self {
            BranchScope::All => None,
            BranchScope::Only(branch) => Some(*branch),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchScope::All => "all",
            BranchScope::Only(branch) => branch.as_str(),
        }
    }
}

impl core::fmt::Display for BranchScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "headquarters" | "admin" => Ok(BranchScope::All),
            other => Ok(BranchScope::Only(other.parse()?)),
        }
    }
}

impl TryFrom<String> for BranchScope {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BranchScope> for String {
    fn from(value: BranchScope) -> Self {
        value.as_str().to_string()
    }
}

impl From<Branch> for BranchScope {
    fn from(value: Branch) -> Self {
        BranchScope::Only(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_ids_are_case_insensitive() {
        assert_eq!(" Laban ".parse::<Branch>().unwrap(), Branch::Laban);
        assert_eq!("TUWAIQ".parse::<Branch>().unwrap(), Branch::Tuwaiq);
        assert!("riyadh".parse::<Branch>().is_err());
    }

    #[test]
    fn headquarters_aliases_map_to_all() {
        for alias in ["all", "headquarters", "admin"] {
            assert_eq!(alias.parse::<BranchScope>().unwrap(), BranchScope::All);
        }
    }

    #[test]
    fn scope_covers_only_its_own_branch() {
        let scope = BranchScope::Only(Branch::Tuwaiq);
        assert!(scope.covers(Branch::Tuwaiq));
        assert!(!scope.covers(Branch::Laban));
        assert!(Branch::ALL.iter().all(|b| BranchScope::All.covers(*b)));
    }

    #[test]
    fn scope_serializes_as_plain_string() {
        let json = serde_json::to_string(&BranchScope::Only(Branch::Laban)).unwrap();
        assert_eq!(json, "\"laban\"");
        let back: BranchScope = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, BranchScope::All);
        assert!(serde_json::from_str::<BranchScope>("\"mars\"").is_err());
    }
}
