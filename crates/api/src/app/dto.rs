use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use branchdesk_auth::{Action, UserProfile};
use branchdesk_core::Branch;
use branchdesk_infra::LedgerEntry;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BranchQuery {
    pub branch_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExplainQuery {
    pub branch_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub branch_id: Option<String>,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    pub occurred_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AmendEntryRequest {
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct LedgerListResponse {
    pub branch: Option<Branch>,
    pub total: i64,
    pub entries: Vec<LedgerEntry>,
}

// -------------------------
// Parsing helpers
// -------------------------

/// Empty and absent values both mean "no branch named".
pub fn parse_branch(raw: Option<&str>) -> Result<Option<Branch>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<Branch>()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("unknown branch_id '{s}'"))),
    }
}

pub fn require_branch(branch: Option<Branch>) -> Result<Branch, ApiError> {
    branch.ok_or_else(|| ApiError::bad_request("branch_id is required"))
}

pub fn parse_action(raw: Option<&str>) -> Result<Action, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("action is required"))?;
    raw.parse::<Action>().map_err(ApiError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_parsing() {
        assert_eq!(parse_branch(None).unwrap(), None);
        assert_eq!(parse_branch(Some("  ")).unwrap(), None);
        assert_eq!(parse_branch(Some("Laban")).unwrap(), Some(Branch::Laban));
        assert_eq!(parse_branch(Some("mars")).unwrap_err().code(), "BadRequest");
    }

    #[test]
    fn action_parsing() {
        assert_eq!(parse_action(Some("edit-revenue")).unwrap(), Action::EditRevenue);
        assert!(parse_action(None).is_err());
        assert!(parse_action(Some("fly")).is_err());
    }
}
