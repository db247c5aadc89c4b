//! Error types for AdminX Core
//!
//! Provides error handling for:
//! - Remote store failures
//! - Mutation protocol rejections and rollbacks
//! - Text generation failures
//! - Configuration loading
//! - Console-level outcomes and how they are surfaced

use adminx_access::AccessError;
use std::path::PathBuf;
use std::time::Duration;

use crate::state_machine::MutationPhase;
use crate::types::{ResourceId, ResourceKind};

/// Remote store failures
///
/// The store contract has no structured taxonomy beyond "failed"; the
/// extra variants only help logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Generic transient failure
    #[error("remote store failed: {0}")]
    Failed(String),

    /// Row missing on the remote side
    #[error("remote store has no row {0}")]
    NotFound(ResourceId),

    /// Call did not resolve within the configured limit
    #[error("remote store timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl StoreError {
    /// Create a generic failure
    #[inline]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Outcome of a mutation attempt that did not confirm
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// Another mutation on the same resource and action is in flight
    #[error("{kind} {id} already has a pending {action}")]
    Busy {
        kind: ResourceKind,
        id: ResourceId,
        action: &'static str,
    },

    /// Resource not present in the local collection
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: ResourceId },

    /// Resource id already present in the local collection
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: ResourceKind, id: ResourceId },

    /// Patch sets no field
    #[error("empty patch for {kind} {id}")]
    EmptyPatch { kind: ResourceKind, id: ResourceId },

    /// Remote call failed; local state was restored
    #[error("{action} on {kind} {id} rolled back: {source}")]
    RolledBack {
        kind: ResourceKind,
        id: ResourceId,
        action: &'static str,
        #[source]
        source: StoreError,
    },

    /// Remote call failed; nothing had been applied locally
    #[error("{action} on {kind} {id} failed: {source}")]
    Failed {
        kind: ResourceKind,
        id: ResourceId,
        action: &'static str,
        #[source]
        source: StoreError,
    },

    /// Initial load from the store failed
    #[error("loading {kind} collection failed: {source}")]
    LoadFailed {
        kind: ResourceKind,
        #[source]
        source: StoreError,
    },

    /// Phase machine rejected a transition
    #[error("illegal mutation transition: {from:?} -> {to:?}")]
    IllegalTransition { from: MutationPhase, to: MutationPhase },
}

impl MutationError {
    /// Whether the remote call failed (as opposed to a local rejection)
    #[inline]
    #[must_use]
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::RolledBack { .. } | Self::Failed { .. } | Self::LoadFailed { .. }
        )
    }

    /// Whether retrying later may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_remote_failure() || matches!(self, Self::Busy { .. })
    }
}

/// Text generation failures
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Nothing to send
    #[error("input is empty")]
    EmptyInput,

    /// API key variable not set
    #[error("generation API key not set (expected env var {0})")]
    MissingApiKey(String),

    /// Transport-level failure
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API
    #[error("generation API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// API answered without any text
    #[error("generation returned no text")]
    EmptyResponse,

    /// Collaborator failed for any other reason
    #[error("generation failed: {0}")]
    Failed(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be produced
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed but semantically invalid
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Main console error type
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Capability check failed
    #[error(transparent)]
    PermissionDenied(#[from] AccessError),

    /// Mutation rejected or rolled back
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// Assistant could not produce text
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Submitted form failed validation
    #[error("invalid input: {0}")]
    Validation(String),
}

impl ConsoleError {
    /// Create validation error
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if error is an access denial
    #[inline]
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::TimedOut(Duration::from_millis(1500));
        assert!(err.to_string().contains("1500ms"));
        assert!(StoreError::failed("boom").to_string().contains("boom"));
    }

    #[test]
    fn mutation_error_classification() {
        let rolled = MutationError::RolledBack {
            kind: ResourceKind::Service,
            id: ResourceId::new("1"),
            action: "toggle",
            source: StoreError::failed("down"),
        };
        assert!(rolled.is_remote_failure());
        assert!(rolled.is_retryable());

        let missing = MutationError::NotFound {
            kind: ResourceKind::Post,
            id: ResourceId::new("9"),
        };
        assert!(!missing.is_remote_failure());
        assert!(!missing.is_retryable());
    }

    #[test]
    fn console_error_from_access() {
        let err: ConsoleError = AccessError::PermissionDenied {
            role: adminx_access::Role::Viewer,
            capability: adminx_access::Capability::ViewLeads,
        }
        .into();
        assert!(err.is_permission_denied());
    }
}
