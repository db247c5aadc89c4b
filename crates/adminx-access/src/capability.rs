//! Capability predicates
//!
//! Each capability is an explicit set of roles. The sets happen to be
//! upward-closed today, but they are not derived from [`Role::rank`]:
//! a capability may legitimately exclude a higher role.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AccessError;
use crate::role::Role;

/// Named feature gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, edit, toggle and delete services and posts; use the assistant
    ManageContent,
    /// See and work the lead pipeline
    ViewLeads,
    /// Change other users' roles
    ManageUsers,
}

impl Capability {
    /// Every capability
    pub const ALL: [Capability; 3] = [
        Capability::ManageContent,
        Capability::ViewLeads,
        Capability::ManageUsers,
    ];

    /// Roles holding this capability
    #[must_use]
    pub const fn granted_to(self) -> &'static [Role] {
        match self {
            Capability::ManageContent => &[Role::Editor, Role::Admin, Role::Owner],
            Capability::ViewLeads => &[Role::Admin, Role::Owner],
            Capability::ManageUsers => &[Role::Owner],
        }
    }

    /// Whether `role` holds this capability
    #[must_use]
    pub fn allows(self, role: Role) -> bool {
        self.granted_to().contains(&role)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::ManageContent => "manage content",
            Capability::ViewLeads => "view leads",
            Capability::ManageUsers => "manage users",
        })
    }
}

/// True iff role is editor, admin or owner
#[inline]
#[must_use]
pub fn can_manage_content(role: Role) -> bool {
    Capability::ManageContent.allows(role)
}

/// True iff role is admin or owner
#[inline]
#[must_use]
pub fn can_view_leads(role: Role) -> bool {
    Capability::ViewLeads.allows(role)
}

/// True iff role is owner
#[inline]
#[must_use]
pub fn can_manage_users(role: Role) -> bool {
    Capability::ManageUsers.allows(role)
}

/// Proof that a capability check passed.
///
/// Only [`require`] constructs it, so an operation taking a `Grant` cannot
/// run without the check having happened first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    role: Role,
    capability: Capability,
}

impl Grant {
    /// Role the grant was issued to
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Capability covered by the grant
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.capability
    }
}

/// Check `capability` for `role`
///
/// # Errors
/// `AccessError::PermissionDenied` when the role is not in the capability's set
pub fn require(role: Role, capability: Capability) -> Result<Grant, AccessError> {
    if capability.allows(role) {
        Ok(Grant { role, capability })
    } else {
        tracing::warn!(%role, %capability, "capability check denied");
        Err(AccessError::PermissionDenied { role, capability })
    }
}

/// Check that `role` meets `required` in the hierarchy
///
/// # Errors
/// `AccessError::InsufficientRole` when `role` ranks below `required`
pub fn require_role(role: Role, required: Role) -> Result<(), AccessError> {
    if role.meets(required) {
        Ok(())
    } else {
        tracing::warn!(%role, %required, "role check denied");
        Err(AccessError::InsufficientRole { role, required })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_issues_grant() {
        let grant = require(Role::Editor, Capability::ManageContent).unwrap();
        assert_eq!(grant.role(), Role::Editor);
        assert_eq!(grant.capability(), Capability::ManageContent);
    }

    #[test]
    fn require_denies_viewer_leads() {
        let err = require(Role::Viewer, Capability::ViewLeads).unwrap_err();
        assert_eq!(
            err,
            AccessError::PermissionDenied {
                role: Role::Viewer,
                capability: Capability::ViewLeads,
            }
        );
        assert!(err.to_string().contains("view leads"));
    }

    #[test]
    fn require_role_uses_rank() {
        assert!(require_role(Role::Admin, Role::Editor).is_ok());
        assert!(require_role(Role::Editor, Role::Admin).is_err());
    }

    #[test]
    fn user_management_is_owner_only() {
        assert!(can_manage_users(Role::Owner));
        assert!(!can_manage_users(Role::Admin));
    }
}
