//! Email/password login and session token issuance.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::password::{self, HashError};
use crate::{
    CredentialStore, Hs256Jwt, JwtClaims, TokenError, TokenValidationError, UserProfile,
    normalize_email,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub user: UserProfile,
}

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<Hs256Jwt>,
    token_ttl: Option<Duration>,
    dummy_hash: String,
}

impl Authenticator {
    /// `cost` is the bcrypt cost used for the decoy hash compared against
    /// when an email is unknown; it should match the cost of stored hashes.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<Hs256Jwt>,
        token_ttl: Option<Duration>,
        cost: u32,
    ) -> Result<Self, HashError> {
        let dummy_hash = password::hash("decoy-password-never-issued", cost)?;
        Ok(Self {
            store,
            tokens,
            token_ttl,
            dummy_hash,
        })
    }

    /// Verify credentials and mint a session token.
    ///
    /// Blocking: runs a bcrypt comparison on every call, including for
    /// unknown emails.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginSuccess, AuthError> {
        let email = normalize_email(email);
        let record = self.store.find_by_email(&email);

        let stored_hash = record
            .as_ref()
            .map(|r| r.password_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let matched = password::verify(password, stored_hash);

        let record = match record {
            Some(record) if matched => record,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let expires_at = match self.token_ttl {
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or(TokenError::Claims(TokenValidationError::InvalidTimeWindow))?,
            ),
            None => None,
        };
        let claims = JwtClaims {
            sub: record.email.clone(),
            uid: record.id,
            issued_at: now,
            expires_at,
        };
        let token = self.tokens.issue(&claims)?;

        Ok(LoginSuccess {
            token,
            user: record.profile(),
        })
    }
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}
