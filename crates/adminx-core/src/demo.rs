//! Demo dataset
//!
//! Seed rows used by the simulated store, the CLI and tests.

use adminx_access::Role;
use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{Lead, LeadStatus, Post, ResourceId, Service, User};

fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn service(id: &str, title: &str, description: &str, price: f64, enabled: bool, created_at: DateTime<Utc>) -> Service {
    Service {
        id: ResourceId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        price,
        enabled,
        created_at,
    }
}

/// Three services, the last one disabled
#[must_use]
pub fn services() -> Vec<Service> {
    vec![
        service(
            "1",
            "Web Development",
            "Custom React & Next.js applications.",
            5000.0,
            true,
            day(2023, 10, 1),
        ),
        service(
            "2",
            "SEO Optimization",
            "Rank higher on search engines.",
            1200.0,
            true,
            day(2023, 11, 15),
        ),
        service("3", "UI/UX Design", "Stunning user interfaces.", 2500.0, false, day(2023, 12, 5)),
    ]
}

/// One published post and one draft
#[must_use]
pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: ResourceId::new("1"),
            title: "Why Next.js is Awesome".to_string(),
            slug: "why-nextjs-is-awesome".to_string(),
            content: "Next.js provides the best developer experience...".to_string(),
            published: true,
            author: "Alex Rivera".to_string(),
            created_at: day(2024, 1, 10),
        },
        Post {
            id: ResourceId::new("2"),
            title: "Admin Dashboards 101".to_string(),
            slug: "admin-dashboards-101".to_string(),
            content: "Creating effective admin panels requires focus on...".to_string(),
            published: false,
            author: "Alex Rivera".to_string(),
            created_at: day(2024, 2, 14),
        },
    ]
}

fn lead(
    id: &str,
    name: &str,
    email: &str,
    source: &str,
    message: &str,
    status: LeadStatus,
    created_at: DateTime<Utc>,
) -> Lead {
    Lead {
        id: ResourceId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        source: source.to_string(),
        message: message.to_string(),
        status,
        created_at,
    }
}

/// Three leads at different pipeline stages
#[must_use]
pub fn leads() -> Vec<Lead> {
    vec![
        lead(
            "1",
            "John Doe",
            "john@example.com",
            "Website",
            "I need a new website for my law firm.",
            LeadStatus::New,
            day(2024, 3, 1),
        ),
        lead(
            "2",
            "Jane Smith",
            "jane@startup.io",
            "Referral",
            "Looking for SEO services for our upcoming launch.",
            LeadStatus::Contacted,
            day(2024, 3, 2),
        ),
        lead(
            "3",
            "Bob Wilson",
            "bob@corp.com",
            "LinkedIn",
            "Urgent UI redesign needed.",
            LeadStatus::New,
            day(2024, 3, 5),
        ),
    ]
}

fn user(id: &str, name: &str, email: &str, role: Role) -> User {
    User {
        id: ResourceId::new(id),
        email: email.to_string(),
        name: name.to_string(),
        role,
        avatar: Some(format!("https://picsum.photos/seed/{id}/200")),
    }
}

/// One user per role
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        user("1", "Alex Rivera", "alex@adminx.com", Role::Owner),
        user("2", "Jordan Smith", "jordan@adminx.com", Role::Admin),
        user("3", "Casey Lee", "casey@adminx.com", Role::Editor),
        user("4", "Riley Vance", "riley@adminx.com", Role::Viewer),
    ]
}

/// Signed-in demo account, acting as `role`
#[must_use]
pub fn current_user(role: Role) -> User {
    User {
        id: ResourceId::new("1"),
        email: "admin@adminx.com".to_string(),
        name: "Alex Rivera".to_string(),
        role,
        avatar: Some("https://picsum.photos/seed/admin/200".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_shape() {
        assert_eq!(services().len(), 3);
        assert!(!services()[2].enabled);
        assert_eq!(posts().iter().filter(|p| p.published).count(), 1);
        assert_eq!(leads().iter().filter(|l| l.status == LeadStatus::New).count(), 2);

        let roles: Vec<Role> = users().iter().map(|u| u.role).collect();
        assert_eq!(roles, vec![Role::Owner, Role::Admin, Role::Editor, Role::Viewer]);
    }

    #[test]
    fn dates_are_parsed() {
        assert_eq!(services()[0].created_at.to_rfc3339(), "2023-10-01T00:00:00+00:00");
    }
}
