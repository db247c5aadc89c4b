//! Resource types for the console
//!
//! Defines the managed business entities and their partial updates:
//! - Opaque resource ids
//! - Services, posts, leads and users
//! - Field patches that can capture their own rollback value

use adminx_access::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Opaque resource identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wrap an existing id
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh local id (ULID for sortability)
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string().to_ascii_lowercase())
    }

    /// Borrow the raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of managed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Billable service offering
    Service,
    /// Blog post
    Post,
    /// Inbound business lead
    Lead,
    /// Console user
    User,
}

impl ResourceKind {
    /// Lowercase singular name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Service => "service",
            ResourceKind::Post => "post",
            ResourceKind::Lead => "lead",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update of a resource
pub trait Patch: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Resource the patch applies to
    type Target;

    /// Write every set field into `target`
    fn apply_to(&self, target: &mut Self::Target);

    /// Patch holding the current values of exactly the fields this patch sets
    fn capture(&self, target: &Self::Target) -> Self;

    /// Whether no field is set
    fn is_empty(&self) -> bool;

    /// Whether the patch sets the resource's togglable flag
    fn touches_flag(&self) -> bool {
        false
    }
}

/// Managed entity with an identity and mutable fields
pub trait Resource: Clone + fmt::Debug + Send + Sync + 'static {
    /// Partial update type
    type Patch: Patch<Target = Self>;

    /// Entity kind
    const KIND: ResourceKind;

    /// Resource id
    fn id(&self) -> &ResourceId;
}

/// Resource with a single togglable boolean
pub trait Flagged: Resource {
    /// Field name, for logs and notices
    const FLAG: &'static str;

    /// Current flag value
    fn flag(&self) -> bool;

    /// Patch setting the flag to `value`
    fn flag_patch(value: bool) -> Self::Patch;
}

/// Billable service offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    /// Price in USD
    pub price: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// New enabled service with a local id
    pub fn draft(title: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            id: ResourceId::generate(),
            title: title.into(),
            description: description.into(),
            price,
            enabled: true,
            created_at: Utc::now(),
        }
    }
}

/// Partial update of a [`Service`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Patch for ServicePatch {
    type Target = Service;

    fn apply_to(&self, target: &mut Service) {
        if let Some(title) = &self.title {
            target.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            target.description.clone_from(description);
        }
        if let Some(price) = self.price {
            target.price = price;
        }
        if let Some(enabled) = self.enabled {
            target.enabled = enabled;
        }
    }

    fn capture(&self, target: &Service) -> Self {
        Self {
            title: self.title.as_ref().map(|_| target.title.clone()),
            description: self.description.as_ref().map(|_| target.description.clone()),
            price: self.price.map(|_| target.price),
            enabled: self.enabled.map(|_| target.enabled),
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.enabled.is_none()
    }

    fn touches_flag(&self) -> bool {
        self.enabled.is_some()
    }
}

impl Resource for Service {
    type Patch = ServicePatch;
    const KIND: ResourceKind = ResourceKind::Service;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Flagged for Service {
    const FLAG: &'static str = "enabled";

    fn flag(&self) -> bool {
        self.enabled
    }

    fn flag_patch(value: bool) -> ServicePatch {
        ServicePatch {
            enabled: Some(value),
            ..ServicePatch::default()
        }
    }
}

/// Blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: ResourceId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published: bool,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// New unpublished post with a local id
    pub fn draft(
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: ResourceId::generate(),
            title: title.into(),
            slug: slug.into(),
            content: content.into(),
            published: false,
            author: author.into(),
            created_at: Utc::now(),
        }
    }
}

/// Partial update of a [`Post`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl Patch for PostPatch {
    type Target = Post;

    fn apply_to(&self, target: &mut Post) {
        if let Some(title) = &self.title {
            target.title.clone_from(title);
        }
        if let Some(slug) = &self.slug {
            target.slug.clone_from(slug);
        }
        if let Some(content) = &self.content {
            target.content.clone_from(content);
        }
        if let Some(published) = self.published {
            target.published = published;
        }
    }

    fn capture(&self, target: &Post) -> Self {
        Self {
            title: self.title.as_ref().map(|_| target.title.clone()),
            slug: self.slug.as_ref().map(|_| target.slug.clone()),
            content: self.content.as_ref().map(|_| target.content.clone()),
            published: self.published.map(|_| target.published),
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.content.is_none() && self.published.is_none()
    }

    fn touches_flag(&self) -> bool {
        self.published.is_some()
    }
}

impl Resource for Post {
    type Patch = PostPatch;
    const KIND: ResourceKind = ResourceKind::Post;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Flagged for Post {
    const FLAG: &'static str = "published";

    fn flag(&self) -> bool {
        self.published
    }

    fn flag_patch(value: bool) -> PostPatch {
        PostPatch {
            published: Some(value),
            ..PostPatch::default()
        }
    }
}

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Closed,
}

impl LeadStatus {
    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "closed" => Ok(LeadStatus::Closed),
            other => Err(format!("unknown lead status: '{other}'")),
        }
    }
}

/// Inbound business lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: ResourceId,
    pub name: String,
    pub email: String,
    pub source: String,
    pub message: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Plain-text context handed to the lead summarizer
    #[must_use]
    pub fn summary_context(&self) -> String {
        format!(
            "Name: {}, Email: {}, Source: {}, Message: {}",
            self.name, self.email, self.source, self.message
        )
    }
}

/// Partial update of a [`Lead`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
}

impl Patch for LeadPatch {
    type Target = Lead;

    fn apply_to(&self, target: &mut Lead) {
        if let Some(status) = self.status {
            target.status = status;
        }
    }

    fn capture(&self, target: &Lead) -> Self {
        Self {
            status: self.status.map(|_| target.status),
        }
    }

    fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}

impl Resource for Lead {
    type Patch = LeadPatch;
    const KIND: ResourceKind = ResourceKind::Lead;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// Console user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial update of a [`User`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Patch for UserPatch {
    type Target = User;

    fn apply_to(&self, target: &mut User) {
        if let Some(role) = self.role {
            target.role = role;
        }
    }

    fn capture(&self, target: &User) -> Self {
        Self {
            role: self.role.map(|_| target.role),
        }
    }

    fn is_empty(&self) -> bool {
        self.role.is_none()
    }
}

impl Resource for User {
    type Patch = UserPatch;
    const KIND: ResourceKind = ResourceKind::User;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Service {
        Service {
            id: ResourceId::new("1"),
            title: "Web Development".to_string(),
            description: "Custom apps.".to_string(),
            price: 5000.0,
            enabled: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn capture_only_touches_set_fields() {
        let svc = service();
        let patch = ServicePatch {
            title: Some("New".to_string()),
            ..ServicePatch::default()
        };
        let inverse = patch.capture(&svc);
        assert_eq!(inverse.title.as_deref(), Some("Web Development"));
        assert!(inverse.price.is_none());
        assert!(inverse.enabled.is_none());
    }

    #[test]
    fn apply_then_inverse_restores() {
        let mut svc = service();
        let original = svc.clone();
        let patch = ServicePatch {
            price: Some(10.0),
            enabled: Some(false),
            ..ServicePatch::default()
        };
        let inverse = patch.capture(&svc);
        patch.apply_to(&mut svc);
        assert_eq!(svc.price, 10.0);
        inverse.apply_to(&mut svc);
        assert_eq!(svc, original);
    }

    #[test]
    fn flag_patch_sets_only_flag() {
        let patch = Post::flag_patch(true);
        assert_eq!(patch.published, Some(true));
        assert!(patch.title.is_none());
        assert!(!patch.is_empty());
        assert!(PostPatch::default().is_empty());
    }

    #[test]
    fn flag_field_is_reported() {
        assert!(Service::flag_patch(true).touches_flag());
        assert!(Post::flag_patch(false).touches_flag());
        let rename = PostPatch {
            title: Some("Renamed".to_string()),
            ..PostPatch::default()
        };
        assert!(!rename.touches_flag());
        assert!(!LeadPatch { status: Some(LeadStatus::Closed) }.touches_flag());
    }

    #[test]
    fn patch_serializes_set_fields_only() {
        let json = serde_json::to_string(&Service::flag_patch(false)).unwrap();
        assert_eq!(json, r#"{"enabled":false}"#);
    }

    #[test]
    fn lead_summary_context_lists_fields() {
        let lead = Lead {
            id: ResourceId::new("1"),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            source: "Website".to_string(),
            message: "Need a site.".to_string(),
            status: LeadStatus::New,
            created_at: Utc::now(),
        };
        assert_eq!(
            lead.summary_context(),
            "Name: John Doe, Email: john@example.com, Source: Website, Message: Need a site."
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ResourceId::generate(), ResourceId::generate());
    }
}
