//! Infrastructure layer: in-memory stores and account provisioning.

pub mod credentials;
pub mod ledger;
pub mod provisioning;
pub mod read_model;

pub use credentials::InMemoryCredentialStore;
pub use ledger::{
    EntryPatch, LedgerBook, LedgerEntry, LedgerKind, LedgerStatement, MAX_ENTRY_AMOUNT,
    NewLedgerEntry,
};
pub use read_model::{BranchStore, InMemoryBranchStore};
