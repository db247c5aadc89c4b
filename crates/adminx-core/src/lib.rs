//! AdminX Core - console state and optimistic mutations
//!
//! The signed-in console that:
//! - Holds the service, post, lead and user collections
//! - Applies toggles, edits and creates optimistically and rolls them back on failure
//! - Deletes pessimistically
//! - Re-checks the session role's capability on every action
//! - Delegates copywriting to a text generation collaborator
//!
//! # Example
//!
//! ```rust,ignore
//! use adminx_core::{demo, Console, ConsoleConfig, GeminiClient, ResourceId};
//! use adminx_access::Role;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::new();
//! let generator = Arc::new(GeminiClient::from_config(&config.generation)?);
//! let console = Console::demo(demo::current_user(Role::Admin), generator, config);
//!
//! console.load_all().await?;
//! let enabled = console.toggle_service(&ResourceId::new("1")).await?;
//! println!("service 1 enabled: {enabled}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod console;
pub mod demo;
pub mod error;
pub mod generation;
pub mod mutation;
pub mod notice;
pub mod query;
pub mod session;
pub mod slug;
pub mod state_machine;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use config::{ConsoleConfig, GenerationConfig, LatencyProfile, MutationConfig, NoticeConfig, OverlapPolicy};
pub use console::{Console, LoadReport, PostForm, ServiceForm, Stores};
pub use error::{ConfigError, ConsoleError, GenerationError, MutationError, StoreError};
pub use generation::{Assistant, GeminiClient, PromptKind, TextGenerator};
pub use mutation::{Action, MutationKey, MutationPolicy, MutationTrail, ResourceBoard};
pub use notice::{Level, Notice, NoticeBoard, Surface};
pub use query::{filter_leads, filter_posts, filter_services, DashboardStats, LeadFilter, PostFilter};
pub use session::{Preferences, Session, SessionReceipt};
pub use slug::{slugify, unique_slug};
pub use state_machine::{allowed_transitions, validate_transition, MutationPhase};
pub use store::{RemoteStore, SimulatedStore};
pub use types::{
    Flagged, Lead, LeadPatch, LeadStatus, Patch, Post, PostPatch, Resource, ResourceId, ResourceKind, Service,
    ServicePatch, User, UserPatch,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with AdminX Core
    pub use crate::{
        Action, Console, ConsoleConfig, ConsoleError, Flagged, MutationError, MutationPhase, OverlapPolicy, Patch,
        Resource, ResourceBoard, ResourceId, ResourceKind, TextGenerator,
    };
    pub use adminx_access::{Capability, Role};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
