use std::result::Result as StdResult;

use thiserror::Error;

use crate::modal::ModalHandle;

/// Misuse of the wizard controller or its schema registry.
///
/// These never come from user input: they mean the hosting code drove the
/// wizard out of contract and should be fixed, not shown to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("step {step} is out of range (wizard has {total} steps)")]
    StepOutOfRange { step: usize, total: usize },
    #[error("a wizard needs at least one step")]
    NoSteps,
    #[error("field `{0}` is declared by more than one step")]
    DuplicateField(String),
    #[error("field `{0}` is not declared by any step")]
    UnknownField(String),
    #[error("submit is only allowed from the final step (on step {current} of {total})")]
    NotFinalStep { current: usize, total: usize },
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("wizard is busy submitting")]
    Busy,
    #[error("wizard has already completed")]
    AlreadyCompleted,
    #[error("no submission is in flight")]
    NothingInFlight,
    #[error("submission ticket belongs to another wizard")]
    ForeignTicket,
}

/// Failure reported by the remote data API for a create/update call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("modal {0} is not open")]
    NotOpen(ModalHandle),
    #[error("wizard modal is not open")]
    WizardClosed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Session token cannot be empty")]
    EmptyToken,
    #[error("{role} accounts cannot open the {portal} portal")]
    Forbidden { role: String, portal: String },
    #[error("Session storage error: {0}")]
    Store(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Store(err.to_string())
    }
}

/// Unified error type for configuration, storage and wizard plumbing.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Modal(#[from] ModalError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type Result<T> = StdResult<T, PortalError>;
