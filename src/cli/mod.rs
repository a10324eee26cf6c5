pub mod commands;
pub mod io;
pub mod output;
pub mod wizard;

use thiserror::Error;

use crate::errors::{ModalError, PortalError, SessionError, WizardError};

pub use commands::{run, run_cli};
pub use wizard::{
    run_wizard, ConfirmationResponse, DialoguerInteraction, FieldPrompt, FormResult,
    PromptResponse, ScriptedInteraction, WizardInteraction,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

impl From<WizardError> for CliError {
    fn from(err: WizardError) -> Self {
        CliError::Portal(PortalError::Wizard(err))
    }
}

impl From<ModalError> for CliError {
    fn from(err: ModalError) -> Self {
        CliError::Portal(PortalError::Modal(err))
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        CliError::Portal(PortalError::Session(err))
    }
}
