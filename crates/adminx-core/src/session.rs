//! Signed-in session context

use adminx_access::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::User;

/// UI preferences carried by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
    pub sidebar_open: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sidebar_open: true,
        }
    }
}

/// Authenticated user plus preferences, created at login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: Uuid,
    user: User,
    preferences: Preferences,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user`
    #[must_use]
    pub fn start(user: User) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            user,
            preferences: Preferences::default(),
            started_at: Utc::now(),
        };
        tracing::info!(session = %session.id, user = %session.user.id, role = %session.user.role, "session started");
        session
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Role every permission check uses
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role
    }

    #[inline]
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.preferences.dark_mode = !self.preferences.dark_mode;
        self.preferences.dark_mode
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.preferences.sidebar_open = !self.preferences.sidebar_open;
        self.preferences.sidebar_open
    }

    #[inline]
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Close the session
    #[must_use]
    pub fn end(self) -> SessionReceipt {
        let ended_at = Utc::now();
        tracing::info!(session = %self.id, user = %self.user.id, "session ended");
        SessionReceipt {
            session_id: self.id,
            user_id: self.user.id.to_string(),
            started_at: self.started_at,
            ended_at,
        }
    }
}

/// Record of a closed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReceipt {
    pub session_id: Uuid,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}
