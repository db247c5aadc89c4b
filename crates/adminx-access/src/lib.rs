//! AdminX Access - role hierarchy and capability predicates
//!
//! Pure, total checks used by every gated surface of the console:
//! - Role ranks and `has_permission` comparisons
//! - Explicit capability sets (`can_manage_content`, `can_view_leads`, ...)
//! - `Grant` proofs issued by `require`
//! - Sidebar visibility
//!
//! # Example
//!
//! ```rust
//! use adminx_access::{can_view_leads, require, Capability, Role};
//!
//! let role: Role = "admin".parse().unwrap();
//! assert!(can_view_leads(role));
//! assert!(require(Role::Viewer, Capability::ViewLeads).is_err());
//! ```

#![warn(unreachable_pub)]

pub mod capability;
pub mod error;
pub mod navigation;
pub mod role;

pub use capability::{
    can_manage_content, can_manage_users, can_view_leads, require, require_role, Capability,
    Grant,
};
pub use error::{AccessError, RoleParseError};
pub use navigation::{visible_nav, NavItem, Section, NAV_ITEMS};
pub use role::{has_permission, Role};
