//! # Service Layer
//!
//! The operations a back office runs against the catalog live here:
//!
//! - [`taxonomy`]: add/remove/rename at each level of the taxonomy tree, each
//!   followed by a forced full refresh of the tree.
//! - [`counters`]: product counts per taxonomy node, kept stale on failure.
//!
//! Services hold no UI concerns. Anything a person should see is sent to a
//! [`Notifier`] as a [`Notice`]; anything an operator should see goes to
//! `tracing`. The caller still gets a `Result`, so a dialog can stay open when
//! a mutation failed.
//!
//! ## Testing
//!
//! Service tests run against `InMemoryStore` seeded through
//! `store::memory::fixtures`, with a [`NoticeLog`] collecting notices.

use parking_lot::Mutex;
use serde::Serialize;

pub mod counters;
pub mod taxonomy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            content: content.into(),
        }
    }
}

/// Receives user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices in memory until drained.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
