//! Seams to the remote data API and the toast surface.
//!
//! Both are black boxes to the wizard layer: a [`Submitter`] turns a draft
//! into a created entity (or a server-provided error), a [`Notifier`] shows
//! fire-and-forget feedback.

pub mod directory;

use tracing::{info, warn};

use crate::errors::SubmissionError;

pub use directory::InMemoryDirectory;

/// Create/update call against the remote data API.
pub trait Submitter<D> {
    type Entity;

    fn submit(&mut self, draft: &D) -> Result<Self::Entity, SubmissionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, toast: Toast);
}

/// Sends toasts to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, toast: Toast) {
        match toast.kind {
            ToastKind::Error => warn!(target: "portal_core::toast", "{}", toast.message),
            ToastKind::Success | ToastKind::Info => {
                info!(target: "portal_core::toast", "{}", toast.message)
            }
        }
    }
}

/// Keeps every toast, for assertions and replay.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub toasts: Vec<Toast>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }
}
