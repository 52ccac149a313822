//! `branchdesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: credential
//! lookup goes through the [`CredentialStore`] trait, and the guard in
//! [`authorize`] is a pure function of its inputs.

pub mod authenticator;
pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod user;

pub use authenticator::{AuthError, Authenticator, LoginSuccess};
pub use authorize::{
    Action, AuthorizationExplanation, AuthzError, DenialKind, authorize, authorize_action,
    explain_authorization,
};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256Jwt, JwtValidator, TokenError};
pub use permissions::{Capability, Permissions};
pub use principal::Principal;
pub use roles::Role;
pub use user::{CredentialStore, UserProfile, UserRecord, normalize_email};
