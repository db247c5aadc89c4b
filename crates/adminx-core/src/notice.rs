//! User-visible notices
//!
//! Three surfaces, one per error category:
//! - access denied: blocking view, cannot be dismissed
//! - toast: transient, dismissible (remote mutation failures, confirmations)
//! - inline: attached to a form field, offers a retry (generation failures)

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ConsoleError;

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// Dismissible toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub level: Level,
    pub message: String,
}

/// Where an error is shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum Surface {
    /// Blocking, non-dismissible view replacing the gated content
    AccessDenied { message: String },
    /// Transient, dismissible notice
    Toast { message: String },
    /// Inline notice next to the field, with a manual retry
    Inline { message: String, retry: bool },
}

impl Surface {
    /// Whether the user can close it
    #[inline]
    #[must_use]
    pub fn is_dismissible(&self) -> bool {
        !matches!(self, Self::AccessDenied { .. })
    }
}

impl ConsoleError {
    /// Surface this error is shown on
    #[must_use]
    pub fn surface(&self) -> Surface {
        match self {
            ConsoleError::PermissionDenied(e) => Surface::AccessDenied {
                message: format!(
                    "Unauthorized: your current role ({}) does not permit this section.",
                    e.role()
                ),
            },
            ConsoleError::Mutation(e) => Surface::Toast {
                message: e.to_string(),
            },
            ConsoleError::Generation(_) => Surface::Inline {
                message: "AI was unable to generate text. Try again or enter it manually.".to_string(),
                retry: true,
            },
            ConsoleError::Validation(message) => Surface::Inline {
                message: message.clone(),
                retry: false,
            },
        }
    }
}

/// Shared, bounded queue of toasts
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    next_id: AtomicU64,
    notices: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    /// Create board holding at most `capacity` notices
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                capacity: capacity.max(1),
                next_id: AtomicU64::new(1),
                notices: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Raise an error toast
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(Level::Error, message.into())
    }

    /// Raise an info toast
    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(Level::Info, message.into())
    }

    fn push(&self, level: Level, message: String) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let mut notices = self.inner.notices.lock();
        if notices.len() == self.inner.capacity {
            notices.pop_front();
        }
        notices.push_back(Notice { id, level, message });
        id
    }

    /// Close a notice; returns whether it was present
    pub fn dismiss(&self, id: u64) -> bool {
        let mut notices = self.inner.notices.lock();
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    /// Open notices, oldest first
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        self.inner.notices.lock().iter().cloned().collect()
    }

    /// Open error notices
    #[must_use]
    pub fn errors(&self) -> Vec<Notice> {
        self.inner
            .notices
            .lock()
            .iter()
            .filter(|n| n.level == Level::Error)
            .cloned()
            .collect()
    }

    /// Close everything
    pub fn clear(&self) {
        self.inner.notices.lock().clear();
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use adminx_access::{AccessError, Capability, Role};

    #[test]
    fn dismiss_removes_notice() {
        let board = NoticeBoard::default();
        let id = board.error("Failed to update service status.");
        board.info("Lead marked as contacted");
        assert_eq!(board.active().len(), 2);
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert!(board.errors().is_empty());
    }

    #[test]
    fn capacity_drops_oldest() {
        let board = NoticeBoard::new(2);
        board.info("a");
        board.info("b");
        board.info("c");
        let messages: Vec<String> = board.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn clones_share_state() {
        let board = NoticeBoard::default();
        let other = board.clone();
        other.error("boom");
        assert_eq!(board.errors().len(), 1);
    }

    #[test]
    fn surfaces_follow_error_category() {
        let denied = ConsoleError::from(AccessError::PermissionDenied {
            role: Role::Viewer,
            capability: Capability::ViewLeads,
        })
        .surface();
        assert!(!denied.is_dismissible());
        assert!(matches!(&denied, Surface::AccessDenied { message } if message.contains("viewer")));

        let inline = ConsoleError::from(GenerationError::EmptyResponse).surface();
        assert_eq!(
            inline,
            Surface::Inline {
                message: "AI was unable to generate text. Try again or enter it manually.".to_string(),
                retry: true,
            }
        );
        assert!(inline.is_dismissible());
    }
}
