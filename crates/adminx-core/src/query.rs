//! Search filters and dashboard figures

use serde::{Deserialize, Serialize};

use crate::types::{Lead, LeadStatus, Post, Service};

fn matches(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Services whose title contains `search` (case-insensitive)
#[must_use]
pub fn filter_services<'a>(services: &'a [Service], search: &str) -> Vec<&'a Service> {
    let needle = search.trim().to_lowercase();
    services.iter().filter(|s| matches(&s.title, &needle)).collect()
}

/// Post listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl PostFilter {
    fn admits(self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Published => post.published,
            PostFilter::Draft => !post.published,
        }
    }
}

/// Posts whose title or content contains `search`, restricted by `filter`
#[must_use]
pub fn filter_posts<'a>(posts: &'a [Post], search: &str, filter: PostFilter) -> Vec<&'a Post> {
    let needle = search.trim().to_lowercase();
    posts
        .iter()
        .filter(|p| filter.admits(p))
        .filter(|p| matches(&p.title, &needle) || matches(&p.content, &needle))
        .collect()
}

/// Lead listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadFilter {
    #[default]
    All,
    Status(LeadStatus),
}

/// Leads whose name or email contains `search`, restricted by `filter`
#[must_use]
pub fn filter_leads<'a>(leads: &'a [Lead], search: &str, filter: LeadFilter) -> Vec<&'a Lead> {
    let needle = search.trim().to_lowercase();
    leads
        .iter()
        .filter(|l| match filter {
            LeadFilter::All => true,
            LeadFilter::Status(status) => l.status == status,
        })
        .filter(|l| matches(&l.name, &needle) || matches(&l.email, &needle))
        .collect()
}

/// Overview figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardStats {
    pub active_services: usize,
    pub live_posts: usize,
    pub draft_posts: usize,
    pub open_leads: usize,
    /// Sum of enabled service prices, USD
    pub revenue: f64,
}

impl DashboardStats {
    /// Compute from the current collections
    #[must_use]
    pub fn compute(services: &[Service], posts: &[Post], leads: &[Lead]) -> Self {
        let live_posts = posts.iter().filter(|p| p.published).count();
        Self {
            active_services: services.iter().filter(|s| s.enabled).count(),
            live_posts,
            draft_posts: posts.len() - live_posts,
            open_leads: leads.iter().filter(|l| l.status != LeadStatus::Closed).count(),
            revenue: services.iter().filter(|s| s.enabled).map(|s| s.price).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn service_search_is_case_insensitive() {
        let services = demo::services();
        let hits = filter_services(&services, "seo");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "SEO Optimization");
        assert_eq!(filter_services(&services, "  ").len(), 3);
    }

    #[test]
    fn post_filters_combine() {
        let posts = demo::posts();
        assert_eq!(filter_posts(&posts, "", PostFilter::Draft).len(), 1);
        assert_eq!(filter_posts(&posts, "developer", PostFilter::All).len(), 1);
        assert!(filter_posts(&posts, "developer", PostFilter::Draft).is_empty());
    }

    #[test]
    fn lead_filters_match_name_or_email() {
        let leads = demo::leads();
        assert_eq!(filter_leads(&leads, "corp.com", LeadFilter::All).len(), 1);
        assert_eq!(filter_leads(&leads, "", LeadFilter::Status(LeadStatus::New)).len(), 2);
        assert!(filter_leads(&leads, "jane", LeadFilter::Status(LeadStatus::New)).is_empty());
    }

    #[test]
    fn stats_from_demo_data() {
        let stats = DashboardStats::compute(&demo::services(), &demo::posts(), &demo::leads());
        assert_eq!(stats.active_services, 2);
        assert_eq!(stats.live_posts, 1);
        assert_eq!(stats.draft_posts, 1);
        assert_eq!(stats.open_leads, 3);
        assert!((stats.revenue - 6200.0).abs() < f64::EPSILON);
    }
}
