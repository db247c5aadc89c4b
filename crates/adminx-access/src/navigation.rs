//! Navigation visibility
//!
//! Static sidebar table, each entry carrying its own role set. Visibility
//! here is presentation only: the pages behind the links re-check their
//! capability.

use serde::Serialize;

use crate::capability::Capability;
use crate::role::Role;

const EVERYONE: &[Role] = &[Role::Viewer, Role::Editor, Role::Admin, Role::Owner];

/// Sidebar section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Dashboard overview
    Overview,
    /// Service catalog
    Services,
    /// Blog posts
    Posts,
    /// Lead pipeline
    Leads,
    /// User management
    Users,
    /// Account settings
    Settings,
}

impl Section {
    /// Capability the page behind this section checks, if any
    #[must_use]
    pub const fn gate(self) -> Option<Capability> {
        match self {
            Section::Leads => Some(Capability::ViewLeads),
            Section::Users => Some(Capability::ManageUsers),
            Section::Overview | Section::Services | Section::Posts | Section::Settings => None,
        }
    }
}

/// One sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Section the entry opens
    pub section: Section,
    /// Display label
    pub label: &'static str,
    /// Route
    pub href: &'static str,
    /// Roles that see the entry
    #[serde(skip)]
    pub roles: &'static [Role],
}

impl NavItem {
    /// Whether `role` sees this entry
    #[inline]
    #[must_use]
    pub fn visible_to(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Sidebar table, in display order
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        section: Section::Overview,
        label: "Overview",
        href: "/dashboard",
        roles: EVERYONE,
    },
    NavItem {
        section: Section::Services,
        label: "Services",
        href: "/dashboard/services",
        roles: EVERYONE,
    },
    NavItem {
        section: Section::Posts,
        label: "Posts",
        href: "/dashboard/posts",
        roles: EVERYONE,
    },
    // Viewers see the link; the leads page itself denies them.
    NavItem {
        section: Section::Leads,
        label: "Leads",
        href: "/dashboard/leads",
        roles: &[Role::Viewer, Role::Admin, Role::Owner],
    },
    NavItem {
        section: Section::Users,
        label: "Users",
        href: "/dashboard/users",
        roles: &[Role::Owner],
    },
    NavItem {
        section: Section::Settings,
        label: "Settings",
        href: "/dashboard/settings",
        roles: EVERYONE,
    },
];

/// Entries visible to `role`, in display order
#[must_use]
pub fn visible_nav(role: Role) -> Vec<&'static NavItem> {
    NAV_ITEMS.iter().filter(|item| item.visible_to(role)).collect()
}
