//! bcrypt password hashing.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

pub fn hash(password: &str, cost: u32) -> Result<String, HashError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Constant-shape verification: any failure, including an unparseable stored
/// hash, is reported as a mismatch.
pub fn verify(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash could not be checked");
            false
        }
    }
}
