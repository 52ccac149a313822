use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use branchdesk_core::UserId;

/// Session token claims (transport-agnostic).
///
/// Claims only identify the account. Role, branch scope and permissions are
/// re-read from the credential store on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the normalized account email.
    pub sub: String,

    /// Account id, checked against the stored record on resolution.
    pub uid: UserId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp. `None` means the token does not expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only. Signature verification lives in
/// [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if let Some(expires_at) = claims.expires_at {
        if expires_at <= claims.issued_at {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
        if now >= expires_at {
            return Err(TokenValidationError::Expired);
        }
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    Ok(())
}
