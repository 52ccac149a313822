//! Service wiring: credential store, token codec, authenticator, ledgers.

use std::sync::Arc;

use anyhow::Context;

use branchdesk_auth::{Authenticator, Hs256Jwt};
use branchdesk_infra::provisioning::{self, UserSeed};
use branchdesk_infra::{InMemoryCredentialStore, LedgerBook, LedgerKind};

use crate::config::AppConfig;

pub struct AppServices {
    pub users: Arc<InMemoryCredentialStore>,
    pub jwt: Arc<Hs256Jwt>,
    pub authenticator: Authenticator,
    pub revenues: LedgerBook,
    pub expenses: LedgerBook,
}

impl AppServices {
    /// Wire services around an already-provisioned credential store.
    ///
    /// Blocking: hashes the authenticator's decoy password.
    pub fn new(users: Arc<InMemoryCredentialStore>, config: &AppConfig) -> anyhow::Result<Self> {
        let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes()));
        let authenticator =
            Authenticator::new(users.clone(), jwt.clone(), config.token_ttl, config.bcrypt_cost)
                .context("initializing authenticator")?;

        Ok(Self {
            users,
            jwt,
            authenticator,
            revenues: LedgerBook::in_memory(LedgerKind::Revenue),
            expenses: LedgerBook::in_memory(LedgerKind::Expense),
        })
    }

    pub fn book(&self, kind: LedgerKind) -> &LedgerBook {
        match kind {
            LedgerKind::Revenue => &self.revenues,
            LedgerKind::Expense => &self.expenses,
        }
    }
}

/// Provision accounts per `config` and wire services.
///
/// Blocking (bcrypt); call from `spawn_blocking` inside a runtime.
pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let mut seeds: Vec<UserSeed> = Vec::new();
    if config.seed_demo_users {
        seeds.extend(provisioning::demo_users());
    }
    if let Some(path) = &config.users_file {
        seeds.extend(provisioning::load_users_file(path)?);
    }

    let users = Arc::new(InMemoryCredentialStore::new());
    let added = provisioning::provision(&users, seeds, config.bcrypt_cost)?;
    if added == 0 {
        tracing::warn!("no accounts provisioned; every login will fail");
    } else {
        tracing::info!(accounts = added, demo = config.seed_demo_users, "accounts provisioned");
    }

    AppServices::new(users, config)
}
