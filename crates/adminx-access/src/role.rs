//! Role hierarchy
//!
//! Roles form a strict total order `viewer < editor < admin < owner`.
//! The set is closed: unknown names are rejected where they enter the
//! system (`FromStr`, serde), never inside a predicate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RoleParseError;

/// Privilege level held by a console user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access
    Viewer,
    /// Can manage content (services, posts)
    Editor,
    /// Can manage content and see the lead pipeline
    Admin,
    /// Full control, including user management
    Owner,
}

impl Role {
    /// Every role, lowest privilege first
    pub const ALL: [Role; 4] = [Role::Viewer, Role::Editor, Role::Admin, Role::Owner];

    /// Rank in the hierarchy. Strictly increasing with privilege.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::Editor => 2,
            Role::Admin => 3,
            Role::Owner => 4,
        }
    }

    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }

    /// Whether this role meets or exceeds `required`
    #[inline]
    #[must_use]
    pub const fn meets(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

/// `rank(actor) >= rank(required)`
#[inline]
#[must_use]
pub const fn has_permission(actor: Role, required: Role) -> bool {
    actor.meets(required)
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            _ => Err(RoleParseError::Unknown(s.to_string())),
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = RoleParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_match_hierarchy() {
        assert_eq!(Role::Viewer.rank(), 1);
        assert_eq!(Role::Editor.rank(), 2);
        assert_eq!(Role::Admin.rank(), 3);
        assert_eq!(Role::Owner.rank(), 4);
    }

    #[test]
    fn all_is_sorted_by_rank() {
        let ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn ordering_follows_rank() {
        assert!(Role::Viewer < Role::Editor);
        assert!(Role::Admin < Role::Owner);
        assert_eq!(Role::ALL.iter().max(), Some(&Role::Owner));
    }

    #[test]
    fn parse_accepts_known_names() {
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
        assert_eq!(" Owner ".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!(Role::try_from("ADMIN").unwrap(), Role::Admin);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("superuser"));
    }

    #[test]
    fn display_round_trips() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
