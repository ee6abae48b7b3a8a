//! Actor role identifiers.
//!
//! # Purpose
//! Wraps the role string supplied by the calling layer so role values are not
//! confused with module keys or capability strings.
//!
//! # Key invariants
//! - Roles are open-ended: any string is a valid role to query.
//! - The elevated set is fixed at compile time and cannot be changed through
//!   the permission table.
use serde::{Deserialize, Serialize};

/// Roles that bypass every capability check.
pub const ELEVATED_ROLES: [&str; 2] = ["admin", "superadmin"];

/// Actor role wrapper.
///
/// # Example
/// ```rust
/// use gatehouse_authz::Role;
///
/// assert!(Role::new("admin").is_elevated());
/// assert!(!Role::new("operator").is_elevated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this role is exempt from capability checks.
    pub fn is_elevated(&self) -> bool {
        is_elevated(&self.0)
    }
}

/// Membership test against [`ELEVATED_ROLES`] without allocating a [`Role`].
pub fn is_elevated(role: &str) -> bool {
    ELEVATED_ROLES.contains(&role)
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::borrow::Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}
