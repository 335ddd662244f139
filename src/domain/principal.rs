//! Authenticated caller identity.

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May approve bookings.
    Admin,
    /// Regular client.
    User,
}

impl Role {
    /// Parses the role names used in token configuration.
    ///
    /// Unknown names map to [`Role::User`] so that an unrecognised role
    /// never grants admin rights.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// Identity yielded by the authentication collaborator for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Caller's user id.
    pub id: i64,
    /// Caller's role.
    pub role: Role,
}

impl Principal {
    /// Returns `true` if the principal holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
