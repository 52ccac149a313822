//! Account provisioning: demo accounts and read-only user files.
//!
//! Provisioning happens once at startup. The running service never writes
//! accounts back.

use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;

use branchdesk_auth::{Permissions, Role, UserRecord, password};
use branchdesk_core::{Branch, BranchScope, UserId};

use crate::InMemoryCredentialStore;

/// One account as written in a users file.
///
/// Exactly one of `password_hash` (bcrypt) or `password` (plaintext, hashed on
/// load) must be present. `permissions` defaults to the role's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub role: Role,
    pub branch: BranchScope,
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

impl UserSeed {
    fn demo(email: &str, name: &str, password: &str, role: Role, branch: BranchScope) -> Self {
        Self {
            email: email.to_string(),
            display_name: Some(name.to_string()),
            password_hash: None,
            password: Some(password.to_string()),
            role,
            branch,
            permissions: None,
        }
    }

    pub fn into_record(self, cost: u32) -> anyhow::Result<UserRecord> {
        let password_hash = match (self.password_hash, self.password) {
            (Some(hash), None) => hash,
            (None, Some(plain)) => password::hash(&plain, cost)
                .with_context(|| format!("hashing password for '{}'", self.email))?,
            _ => bail!(
                "user '{}' must set exactly one of password_hash or password",
                self.email
            ),
        };

        let display_name = self
            .display_name
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string());

        Ok(UserRecord {
            id: UserId::new(),
            email: self.email,
            display_name,
            password_hash,
            permissions: self.permissions.unwrap_or_else(|| self.role.default_permissions()),
            role: self.role,
            branch: self.branch,
        })
    }
}

/// Demo accounts, one per role.
pub fn demo_users() -> Vec<UserSeed> {
    vec![
        UserSeed::demo("Admin@g.com", "Admin", "Admin1230", Role::Admin, BranchScope::All),
        UserSeed::demo(
            "supervisor@g.com",
            "Tuwaiq Supervisor",
            "Super1230",
            Role::Supervisor,
            BranchScope::Only(Branch::Tuwaiq),
        ),
        UserSeed::demo(
            "employee@g.com",
            "Laban Employee",
            "Employee1230",
            Role::Employee,
            BranchScope::Only(Branch::Laban),
        ),
        UserSeed::demo("partner@g.com", "Partner", "Partner1230", Role::Partner, BranchScope::All),
    ]
}

pub fn parse_users(json: &str) -> anyhow::Result<Vec<UserSeed>> {
    serde_json::from_str(json).context("users file must be a JSON array of user records")
}

pub fn load_users_file(path: &Path) -> anyhow::Result<Vec<UserSeed>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading users file {}", path.display()))?;
    parse_users(&raw)
}

/// Hash and insert seeds. Fails on the first invalid or duplicate account.
pub fn provision(
    store: &InMemoryCredentialStore,
    seeds: Vec<UserSeed>,
    cost: u32,
) -> anyhow::Result<usize> {
    let mut added = 0;
    for seed in seeds {
        let record = seed.into_record(cost)?;
        let email = record.email.clone();
        store
            .insert(record)
            .with_context(|| format!("provisioning '{email}'"))?;
        tracing::debug!(email = %email, "account provisioned");
        added += 1;
    }
    Ok(added)
}
