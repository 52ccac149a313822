//! Branch-isolated record storage abstractions.

pub mod branch_store;

pub use branch_store::{BranchStore, InMemoryBranchStore};
