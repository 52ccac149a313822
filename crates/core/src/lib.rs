//! `branchdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod branch;
pub mod error;
pub mod id;

pub use branch::{Branch, BranchScope};
pub use error::{DomainError, DomainResult};
pub use id::{EntryId, UserId};
