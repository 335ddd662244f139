//! Authentication capability.
//!
//! Token issuance and credential checks live outside this service. The
//! core only asks an [`Authenticator`] to turn a bearer token into a
//! [`Principal`]; [`extractor::Authenticated`] does that per request.

pub mod extractor;
pub mod static_tokens;

use std::fmt;

use async_trait::async_trait;

pub use extractor::Authenticated;
pub use static_tokens::{StaticTokenAuthenticator, TokenGrant};

use crate::domain::Principal;

/// Authentication and authorisation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("missing token")]
    Unauthenticated,

    /// Credentials were presented but not accepted.
    #[error("invalid token")]
    InvalidToken,

    /// The principal lacks the role the operation needs.
    #[error("admin role required")]
    Forbidden,
}

/// Resolves an opaque bearer token to a principal.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Validates `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the token is not recognised.
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Fails with [`AuthError::Forbidden`] unless `principal` is an admin.
///
/// # Errors
///
/// See above.
pub fn require_admin(principal: &Principal) -> Result<(), AuthError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
