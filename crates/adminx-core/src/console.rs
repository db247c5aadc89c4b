//! Console facade
//!
//! Ties the session, the four resource boards and the assistant together.
//! Every operation re-checks its capability against the session role before
//! touching a board; hiding a control is never taken as proof of access.

use adminx_access::{require, visible_nav, Capability, Grant, NavItem, Role, Section};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{ConsoleConfig, LatencyProfile};
use crate::demo;
use crate::error::{ConsoleError, MutationError};
use crate::generation::{Assistant, PromptKind, TextGenerator};
use crate::mutation::{Action, MutationPolicy, MutationTrail, ResourceBoard};
use crate::notice::NoticeBoard;
use crate::query::{filter_leads, filter_posts, filter_services, DashboardStats, LeadFilter, PostFilter};
use crate::session::{Session, SessionReceipt};
use crate::slug::{slugify, unique_slug};
use crate::store::{RemoteStore, SimulatedStore};
use crate::types::{
    Lead, LeadPatch, LeadStatus, Patch, Post, PostPatch, Resource, ResourceId, ResourceKind, Service, ServicePatch,
    User, UserPatch,
};

/// Remote stores backing each board
#[derive(Clone)]
pub struct Stores {
    pub services: Arc<dyn RemoteStore<Service>>,
    pub posts: Arc<dyn RemoteStore<Post>>,
    pub leads: Arc<dyn RemoteStore<Lead>>,
    pub users: Arc<dyn RemoteStore<User>>,
}

impl Stores {
    /// Simulated stores seeded with the demo dataset
    #[must_use]
    pub fn simulated(latency: LatencyProfile) -> Self {
        Self {
            services: Arc::new(SimulatedStore::new(latency).with_rows(demo::services())),
            posts: Arc::new(SimulatedStore::new(latency).with_rows(demo::posts())),
            leads: Arc::new(SimulatedStore::new(latency).with_rows(demo::leads())),
            users: Arc::new(SimulatedStore::new(latency).with_rows(demo::users())),
        }
    }
}

/// Service editor fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceForm {
    pub title: String,
    pub description: String,
    /// USD
    pub price: f64,
}

impl ServiceForm {
    fn validate(&self) -> Result<(), ConsoleError> {
        if self.title.trim().is_empty() {
            return Err(ConsoleError::validation("Service title is required."));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ConsoleError::validation("Price must be a non-negative amount."));
        }
        Ok(())
    }

    fn diff(&self, current: &Service) -> ServicePatch {
        let title = self.title.trim();
        let description = self.description.trim();
        ServicePatch {
            title: (current.title != title).then(|| title.to_string()),
            description: (current.description != description).then(|| description.to_string()),
            price: (current.price.to_bits() != self.price.to_bits()).then_some(self.price),
            enabled: None,
        }
    }
}

/// Post editor fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    /// Slugified on save; falls back to the title when blank
    pub slug: String,
    pub content: String,
    pub published: bool,
}

/// Rows fetched per board by [`Console::load_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub services: usize,
    pub posts: usize,
    pub leads: usize,
    pub users: usize,
}

/// Signed-in console
#[derive(Debug)]
pub struct Console {
    session: Session,
    services: ResourceBoard<Service>,
    posts: ResourceBoard<Post>,
    leads: ResourceBoard<Lead>,
    users: ResourceBoard<User>,
    assistant: Assistant,
    notices: NoticeBoard,
    config: ConsoleConfig,
}

impl Console {
    /// Assemble a console over the given stores
    #[must_use]
    pub fn new(session: Session, stores: Stores, generator: Arc<dyn TextGenerator>, config: ConsoleConfig) -> Self {
        let notices = NoticeBoard::new(config.notices.capacity);
        let policy = MutationPolicy::from(&config.mutation);
        Self {
            services: ResourceBoard::new(stores.services, policy, notices.clone()),
            posts: ResourceBoard::new(stores.posts, policy, notices.clone()),
            leads: ResourceBoard::new(stores.leads, policy, notices.clone()),
            users: ResourceBoard::new(stores.users, policy, notices.clone()),
            assistant: Assistant::new(generator),
            session,
            notices,
            config,
        }
    }

    /// Console over simulated stores holding the demo dataset
    #[must_use]
    pub fn demo(user: User, generator: Arc<dyn TextGenerator>, config: ConsoleConfig) -> Self {
        let stores = Stores::simulated(config.latency);
        Self::new(Session::start(user), stores, generator, config)
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.session.role()
    }

    #[inline]
    #[must_use]
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Sidebar entries for the session role
    #[must_use]
    pub fn nav(&self) -> Vec<&'static NavItem> {
        visible_nav(self.role())
    }

    fn require(&self, capability: Capability) -> Result<Grant, ConsoleError> {
        Ok(require(self.role(), capability)?)
    }

    /// Check access to a section's page
    ///
    /// # Errors
    /// `ConsoleError::PermissionDenied` if the section is gated and the role lacks the capability
    pub fn open(&self, section: Section) -> Result<(), ConsoleError> {
        if let Some(capability) = section.gate() {
            self.require(capability)?;
        }
        Ok(())
    }

    /// Fetch every board from its store
    ///
    /// # Errors
    /// The first board load that failed
    pub async fn load_all(&self) -> Result<LoadReport, ConsoleError> {
        let (services, posts, leads, users) = futures::try_join!(
            self.services.load(),
            self.posts.load(),
            self.leads.load(),
            self.users.load(),
        )?;
        tracing::info!(services, posts, leads, users, "console loaded");
        Ok(LoadReport {
            services,
            posts,
            leads,
            users,
        })
    }

    /// Whether `action` on `id` is in flight
    #[must_use]
    pub fn is_pending(&self, kind: ResourceKind, id: &ResourceId, action: Action) -> bool {
        match kind {
            ResourceKind::Service => self.services.is_pending(id, action),
            ResourceKind::Post => self.posts.is_pending(id, action),
            ResourceKind::Lead => self.leads.is_pending(id, action),
            ResourceKind::User => self.users.is_pending(id, action),
        }
    }

    /// Settled mutation attempts of one board
    #[must_use]
    pub fn history(&self, kind: ResourceKind) -> Vec<MutationTrail> {
        match kind {
            ResourceKind::Service => self.services.history(),
            ResourceKind::Post => self.posts.history(),
            ResourceKind::Lead => self.leads.history(),
            ResourceKind::User => self.users.history(),
        }
    }

    /// Overview figures
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.services.snapshot(), &self.posts.snapshot(), &self.leads.snapshot())
    }

    /// Services matching `search`
    #[must_use]
    pub fn services(&self, search: &str) -> Vec<Service> {
        let all = self.services.snapshot();
        filter_services(&all, search).into_iter().cloned().collect()
    }

    /// Flip a service's `enabled` flag
    ///
    /// # Errors
    /// Permission denial or any [`ResourceBoard::toggle`] error
    pub async fn toggle_service(&self, id: &ResourceId) -> Result<bool, ConsoleError> {
        self.require(Capability::ManageContent)?;
        Ok(self.services.toggle(id).await?)
    }

    /// Add a service
    ///
    /// # Errors
    /// Permission denial, validation, or any [`ResourceBoard::create`] error
    pub async fn create_service(&self, form: ServiceForm) -> Result<Service, ConsoleError> {
        self.require(Capability::ManageContent)?;
        form.validate()?;
        let draft = Service::draft(form.title.trim(), form.description.trim(), form.price);
        Ok(self.services.create(draft).await?)
    }

    /// Save edited service fields; unchanged fields are not sent
    ///
    /// # Errors
    /// Permission denial, validation, or any [`ResourceBoard::edit`] error
    pub async fn update_service(&self, id: &ResourceId, form: ServiceForm) -> Result<Service, ConsoleError> {
        self.require(Capability::ManageContent)?;
        form.validate()?;
        let mut current = self.services.get(id).ok_or_else(|| missing::<Service>(id))?;
        let patch = form.diff(&current);
        if !patch.is_empty() {
            self.services.edit(id, patch.clone()).await?;
            patch.apply_to(&mut current);
        }
        Ok(current)
    }

    /// Remove a service once the store confirms
    ///
    /// # Errors
    /// Permission denial or any [`ResourceBoard::delete`] error
    pub async fn delete_service(&self, id: &ResourceId) -> Result<(), ConsoleError> {
        self.require(Capability::ManageContent)?;
        Ok(self.services.delete(id).await?)
    }

    /// Posts matching `search` and `filter`
    #[must_use]
    pub fn posts(&self, search: &str, filter: PostFilter) -> Vec<Post> {
        let all = self.posts.snapshot();
        filter_posts(&all, search, filter).into_iter().cloned().collect()
    }

    /// Publish or unpublish a post
    ///
    /// # Errors
    /// Permission denial or any [`ResourceBoard::toggle`] error
    pub async fn toggle_post(&self, id: &ResourceId) -> Result<bool, ConsoleError> {
        self.require(Capability::ManageContent)?;
        Ok(self.posts.toggle(id).await?)
    }

    /// Create (`editing == None`) or update a post
    ///
    /// The slug is normalized and made unique among the other posts.
    ///
    /// # Errors
    /// - `ConsoleError::Validation` if title, slug or content ends up empty
    /// - permission denial or any board error
    pub async fn save_post(&self, editing: Option<&ResourceId>, form: PostForm) -> Result<Post, ConsoleError> {
        self.require(Capability::ManageContent)?;
        let title = form.title.trim();
        let content = form.content.trim();
        let base = slugify(if form.slug.trim().is_empty() { title } else { &form.slug });
        if title.is_empty() || base.is_empty() || content.is_empty() {
            return Err(ConsoleError::validation("Title, slug, and content are required."));
        }

        let existing = self.posts.snapshot();
        let slug = unique_slug(
            &base,
            existing
                .iter()
                .filter(|p| Some(&p.id) != editing)
                .map(|p| p.slug.as_str()),
        );

        let Some(id) = editing else {
            let mut draft = Post::draft(title, slug, content, self.session.user().name.clone());
            draft.published = form.published;
            return Ok(self.posts.create(draft).await?);
        };

        let mut current = existing
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| missing::<Post>(id))?;
        let patch = PostPatch {
            title: (current.title != title).then(|| title.to_string()),
            slug: (current.slug != slug).then_some(slug),
            content: (current.content != content).then(|| content.to_string()),
            published: (current.published != form.published).then_some(form.published),
        };
        if !patch.is_empty() {
            self.posts.edit(id, patch.clone()).await?;
            patch.apply_to(&mut current);
        }
        Ok(current)
    }

    /// Remove a post once the store confirms
    ///
    /// # Errors
    /// Permission denial or any [`ResourceBoard::delete`] error
    pub async fn delete_post(&self, id: &ResourceId) -> Result<(), ConsoleError> {
        self.require(Capability::ManageContent)?;
        Ok(self.posts.delete(id).await?)
    }

    /// Leads matching `search` and `filter`
    ///
    /// # Errors
    /// `ConsoleError::PermissionDenied` unless the role can view leads
    pub fn leads(&self, search: &str, filter: LeadFilter) -> Result<Vec<Lead>, ConsoleError> {
        self.require(Capability::ViewLeads)?;
        let all = self.leads.snapshot();
        Ok(filter_leads(&all, search, filter).into_iter().cloned().collect())
    }

    /// Move a lead through the pipeline
    ///
    /// # Errors
    /// Permission denial or any [`ResourceBoard::edit`] error
    pub async fn set_lead_status(&self, id: &ResourceId, status: LeadStatus) -> Result<(), ConsoleError> {
        self.require(Capability::ViewLeads)?;
        let patch = LeadPatch { status: Some(status) };
        self.leads.edit(id, patch).await?;
        self.notices.info(format!("Lead marked as {status}"));
        Ok(())
    }

    /// Summary plus follow-up actions for a lead
    ///
    /// # Errors
    /// Permission denial, unknown lead, or generation failure
    pub async fn summarize_lead(&self, id: &ResourceId) -> Result<String, ConsoleError> {
        self.require(Capability::ViewLeads)?;
        let lead = self.leads.get(id).ok_or_else(|| missing::<Lead>(id))?;
        Ok(self.assistant.summarize_lead(&lead).await?)
    }

    /// Every console user
    ///
    /// # Errors
    /// `ConsoleError::PermissionDenied` unless the role can manage users
    pub fn users(&self) -> Result<Vec<User>, ConsoleError> {
        self.require(Capability::ManageUsers)?;
        Ok(self.users.snapshot())
    }

    /// Change a user's role
    ///
    /// # Errors
    /// Permission denial or any [`ResourceBoard::edit`] error
    pub async fn assign_role(&self, id: &ResourceId, role: Role) -> Result<(), ConsoleError> {
        self.require(Capability::ManageUsers)?;
        self.users.edit(id, UserPatch { role: Some(role) }).await?;
        tracing::info!(user = %id, %role, "role assigned");
        Ok(())
    }

    /// Free-form generation
    ///
    /// # Errors
    /// Permission denial or generation failure
    pub async fn generate(&self, kind: PromptKind, input: &str) -> Result<String, ConsoleError> {
        self.require(prompt_gate(kind))?;
        Ok(self.assistant.run(kind, input).await?)
    }

    /// Replace `field` with generated text; `field` is untouched on failure
    ///
    /// # Errors
    /// Permission denial or generation failure
    pub async fn fill_field(&self, kind: PromptKind, input: &str, field: &mut String) -> Result<(), ConsoleError> {
        self.require(prompt_gate(kind))?;
        Ok(self.assistant.fill_field(kind, input, field).await?)
    }

    /// Sign out
    #[must_use]
    pub fn logout(self) -> SessionReceipt {
        self.notices.clear();
        self.session.end()
    }
}

fn prompt_gate(kind: PromptKind) -> Capability {
    match kind {
        PromptKind::SummarizeLead => Capability::ViewLeads,
        PromptKind::Rewrite | PromptKind::ServiceDescription => Capability::ManageContent,
    }
}

fn missing<R: Resource>(id: &ResourceId) -> ConsoleError {
    ConsoleError::Mutation(MutationError::NotFound {
        kind: R::KIND,
        id: id.clone(),
    })
}
