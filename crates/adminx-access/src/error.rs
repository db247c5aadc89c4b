//! Error types for access control

use crate::capability::Capability;
use crate::role::Role;

/// Role name did not match any known role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleParseError {
    /// Unknown role name
    #[error("unknown role: '{0}'")]
    Unknown(String),
}

/// Access check failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Capability predicate returned false
    #[error("permission denied: role '{role}' cannot {capability}")]
    PermissionDenied {
        /// Role of the acting user
        role: Role,
        /// Capability that was required
        capability: Capability,
    },

    /// Role rank below the required role
    #[error("permission denied: role '{role}' does not meet required role '{required}'")]
    InsufficientRole {
        /// Role of the acting user
        role: Role,
        /// Minimum role required
        required: Role,
    },
}

impl AccessError {
    /// Role that was denied
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::PermissionDenied { role, .. } | Self::InsufficientRole { role, .. } => *role,
        }
    }
}
