//! Revenue and expense books, one record per entry, isolated by branch.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use branchdesk_core::{Branch, DomainError, DomainResult, EntryId};

use crate::read_model::{BranchStore, InMemoryBranchStore};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Revenue,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub branch: Branch,
    pub kind: LedgerKind,
    /// Minor currency units; always positive.
    pub amount: i64,
    pub description: String,
    pub occurred_on: NaiveDate,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub amount: i64,
    pub description: String,
    pub occurred_on: NaiveDate,
}

/// Partial update; `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

/// Largest amount a single entry may carry (minor units).
pub const MAX_ENTRY_AMOUNT: i64 = 1_000_000_000_000;

fn validate_amount(amount: i64) -> DomainResult<()> {
    if amount <= 0 {
        return Err(DomainError::validation("amount must be positive"));
    }
    if amount > MAX_ENTRY_AMOUNT {
        return Err(DomainError::validation(format!(
            "amount must not exceed {MAX_ENTRY_AMOUNT}"
        )));
    }
    Ok(())
}

fn checked_total(entries: &[LedgerEntry]) -> DomainResult<i64> {
    entries
        .iter()
        .try_fold(0i64, |acc, e| acc.checked_add(e.amount))
        .ok_or_else(|| DomainError::validation("ledger total is out of range"))
}

/// Entries of one listing together with their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStatement {
    pub entries: Vec<LedgerEntry>,
    pub total: i64,
}

/// One book (revenues or expenses) over a branch-isolated store.
#[derive(Debug)]
pub struct LedgerBook<S = Arc<InMemoryBranchStore<EntryId, LedgerEntry>>> {
    kind: LedgerKind,
    store: S,
}

impl LedgerBook {
    pub fn in_memory(kind: LedgerKind) -> Self {
        Self::new(kind, Arc::new(InMemoryBranchStore::new()))
    }
}

impl<S> LedgerBook<S>
where
    S: BranchStore<EntryId, LedgerEntry>,
{
    pub fn new(kind: LedgerKind, store: S) -> Self {
        Self { kind, store }
    }

    pub fn record(
        &self,
        branch: Branch,
        entry: NewLedgerEntry,
        recorded_by: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<LedgerEntry> {
        validate_amount(entry.amount)?;

        let record = LedgerEntry {
            id: EntryId::new(),
            branch,
            kind: self.kind,
            amount: entry.amount,
            description: entry.description.trim().to_string(),
            occurred_on: entry.occurred_on,
            recorded_by: recorded_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.upsert(branch, record.id, record.clone())?;
        Ok(record)
    }

    /// Amend an entry. Entries written under another branch are `NotFound`.
    pub fn amend(
        &self,
        branch: Branch,
        id: EntryId,
        patch: EntryPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<LedgerEntry> {
        let mut entry = self.store.get(branch, &id)?.ok_or_else(DomainError::not_found)?;

        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            entry.amount = amount;
        }
        if let Some(description) = patch.description {
            entry.description = description.trim().to_string();
        }
        if let Some(occurred_on) = patch.occurred_on {
            entry.occurred_on = occurred_on;
        }
        entry.updated_at = now;

        self.store.upsert(branch, id, entry.clone())?;
        Ok(entry)
    }

    /// Entries for one branch, or every branch when `branch` is `None`,
    /// oldest first, with their total.
    pub fn statement(&self, branch: Option<Branch>) -> DomainResult<LedgerStatement> {
        let mut entries = match branch {
            Some(branch) => self.store.list(branch)?,
            None => self.store.list_all()?,
        };
        entries.sort_by(|a, b| {
            a.occurred_on
                .cmp(&b.occurred_on)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        let total = checked_total(&entries)?;
        Ok(LedgerStatement { entries, total })
    }
}
