//! Fixed token table loaded from configuration.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use super::{AuthError, Authenticator};
use crate::domain::{Principal, Role};

/// One configured token and the principal it stands for.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Opaque bearer token.
    pub token: String,
    /// Principal the token resolves to.
    pub principal: Principal,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token", &"<redacted>")
            .field("principal", &self.principal)
            .finish()
    }
}

impl TokenGrant {
    /// Parses `token=principal_id:role` (role defaults to `user`).
    ///
    /// Returns `None` for malformed entries.
    #[must_use]
    pub fn parse(entry: &str) -> Option<Self> {
        let (token, identity) = entry.trim().split_once('=')?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        let (id, role) = match identity.split_once(':') {
            Some((id, role)) => (id, Role::from_name(role.trim())),
            None => (identity, Role::User),
        };
        let id = id.trim().parse().ok()?;
        Some(Self {
            token: token.to_string(),
            principal: Principal { id, role },
        })
    }
}

/// [`Authenticator`] backed by an in-memory token table.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Principal>,
}

impl fmt::Debug for StaticTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenAuthenticator")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl StaticTokenAuthenticator {
    /// Builds the table. Later grants for the same token win.
    #[must_use]
    pub fn new(grants: impl IntoIterator<Item = TokenGrant>) -> Self {
        Self {
            tokens: grants
                .into_iter()
                .map(|g| (g.token, g.principal))
                .collect(),
        }
    }

    /// Number of configured tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no token is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
