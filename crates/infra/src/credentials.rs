//! In-memory credential store.

use std::collections::HashMap;
use std::sync::RwLock;

use branchdesk_auth::{CredentialStore, UserRecord, normalize_email};
use branchdesk_core::{DomainError, DomainResult};

/// Accounts keyed by normalized email.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account. Emails are unique after normalization.
    pub fn insert(&self, mut record: UserRecord) -> DomainResult<()> {
        record.email = normalize_email(&record.email);
        if record.email.is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }

        let mut users = self
            .users
            .write()
            .map_err(|_| DomainError::storage("credential store lock poisoned"))?;
        if users.contains_key(&record.email) {
            return Err(DomainError::conflict(format!(
                "email '{}' is already registered",
                record.email
            )));
        }
        users.insert(record.email.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let users = self.users.read().ok()?;
        users.get(&normalize_email(email)).cloned()
    }

    fn list(&self) -> Vec<UserRecord> {
        let users = match self.users.read() {
            Ok(u) => u,
            Err(_) => return vec![],
        };
        let mut all: Vec<UserRecord> = users.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        all
    }
}
