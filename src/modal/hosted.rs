//! A wizard bound to one modal.
//!
//! Opening the modal from closed starts a fresh wizard session; closing it
//! (cancel, close button, or an allowed outside click) resets the wizard and
//! abandons any in-flight submission. Completion closes the modal and hands
//! the created entity back to the caller.

use tracing::debug;

use crate::api::{Notifier, Submitter, Toast};
use crate::errors::{ModalError, PortalError, SubmissionError, WizardError};
use crate::forms::validators::FieldKind;
use crate::forms::{Advance, FormFlow, SubmitAttempt, SubmitOutcome, SubmitTicket, WizardController};
use crate::ui::layout::ModalLayout;

use super::{ModalConfig, ModalHandle, ModalHost, ModalIcon};

const NEXT_LABEL: &str = "Next";
const CANCEL_LABEL: &str = "Cancel";

/// Result of pressing the confirm button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmStep<P> {
    Moved { to: usize },
    Blocked { invalid: usize },
    Submit(P),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostedOutcome<E> {
    Completed(E),
    Failed(SubmissionError),
    Discarded,
}

pub struct WizardModal<F: FormFlow> {
    flow: F,
    wizard: WizardController,
    handle: Option<ModalHandle>,
}

impl<F: FormFlow> WizardModal<F> {
    pub fn new(flow: F) -> Result<Self, WizardError> {
        let registry = flow.registry()?;
        let wizard = WizardController::with_defaults(registry, flow.defaults());
        Ok(Self {
            flow,
            wizard,
            handle: None,
        })
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn handle(&self) -> Option<ModalHandle> {
        self.handle
    }

    pub fn is_open(&self, host: &ModalHost) -> bool {
        self.handle.map_or(false, |handle| host.is_open(handle))
    }

    /// Opens the modal. Re-opening an already open modal keeps its session.
    pub fn open(&mut self, host: &mut ModalHost) -> Result<ModalHandle, PortalError> {
        if let Some(handle) = self.handle.filter(|handle| host.is_open(*handle)) {
            return Ok(handle);
        }
        self.wizard.reset();
        let config = ModalConfig::new(self.flow.title())
            .with_icon(ModalIcon::Form)
            .with_footer(CANCEL_LABEL, self.confirm_label())
            .persistent();
        let handle = host.open(config);
        self.handle = Some(handle);
        self.sync(host)?;
        Ok(handle)
    }

    pub fn close(&mut self, host: &mut ModalHost) {
        if let Some(handle) = self.handle.take() {
            host.close(handle);
        }
        self.wizard.reset();
    }

    /// Forwards a backdrop click; returns whether it closed this wizard.
    pub fn outside_click(&mut self, host: &mut ModalHost) -> bool {
        match host.outside_click() {
            Some(closed) if Some(closed) == self.handle => {
                self.handle = None;
                self.wizard.reset();
                true
            }
            _ => false,
        }
    }

    pub fn input(&mut self, host: &mut ModalHost, field: &str, raw: &str) -> Result<(), PortalError> {
        self.require_open(host)?;
        self.wizard.input(field, raw)?;
        self.sync(host)
    }

    pub fn blur(&mut self, host: &mut ModalHost, field: &str) -> Result<(), PortalError> {
        self.require_open(host)?;
        self.wizard.blur(field)?;
        self.sync(host)
    }

    pub fn back(&mut self, host: &mut ModalHost) -> Result<usize, PortalError> {
        self.require_open(host)?;
        let step = self.wizard.back()?;
        self.sync(host)?;
        Ok(step)
    }

    /// Next on intermediate steps, submission start on the final one.
    pub fn confirm(&mut self, host: &mut ModalHost) -> Result<ConfirmStep<SubmitTicket>, PortalError> {
        self.require_open(host)?;
        let step = match self.wizard.next()? {
            Advance::Moved { to } => ConfirmStep::Moved { to },
            Advance::Blocked { invalid } => ConfirmStep::Blocked { invalid },
            Advance::ReadyToSubmit => match self.wizard.begin_submit()? {
                SubmitAttempt::Blocked { invalid } => ConfirmStep::Blocked { invalid },
                SubmitAttempt::Started(ticket) => ConfirmStep::Submit(ticket),
            },
        };
        self.sync(host)?;
        Ok(step)
    }

    /// Draft for the in-flight submission.
    pub fn draft(&self) -> Result<F::Draft, SubmissionError> {
        self.flow.commit(self.wizard.form())
    }

    pub fn finish<E, N: Notifier>(
        &mut self,
        host: &mut ModalHost,
        notifier: &mut N,
        ticket: SubmitTicket,
        result: Result<E, SubmissionError>,
    ) -> Result<HostedOutcome<E>, PortalError> {
        let outcome = match self.wizard.finish_submit(ticket, result)? {
            SubmitOutcome::Completed(entity) => {
                notifier.notify(Toast::success(format!("{} saved", self.flow.title())));
                if let Some(handle) = self.handle.take() {
                    host.close(handle);
                }
                HostedOutcome::Completed(entity)
            }
            SubmitOutcome::Failed(err) => {
                notifier.notify(Toast::error(err.message.clone()));
                self.sync(host)?;
                HostedOutcome::Failed(err)
            }
            SubmitOutcome::Blocked { .. } | SubmitOutcome::Discarded => {
                debug!(wizard = self.wizard.name(), "submission result dropped");
                HostedOutcome::Discarded
            }
        };
        Ok(outcome)
    }

    /// Confirm, and on the final step run the submission synchronously.
    pub fn confirm_with<S, N>(
        &mut self,
        host: &mut ModalHost,
        submitter: &mut S,
        notifier: &mut N,
    ) -> Result<ConfirmStep<HostedOutcome<S::Entity>>, PortalError>
    where
        S: Submitter<F::Draft>,
        N: Notifier,
    {
        match self.confirm(host)? {
            ConfirmStep::Moved { to } => Ok(ConfirmStep::Moved { to }),
            ConfirmStep::Blocked { invalid } => Ok(ConfirmStep::Blocked { invalid }),
            ConfirmStep::Submit(ticket) => {
                let result = self.draft().and_then(|draft| submitter.submit(&draft));
                let outcome = self.finish(host, notifier, ticket, result)?;
                Ok(ConfirmStep::Submit(outcome))
            }
        }
    }

    pub fn render(&self, host: &ModalHost, layout: &dyn ModalLayout) -> Result<Vec<String>, PortalError> {
        let handle = self.require_open(host)?;
        Ok(host.render(handle, layout)?)
    }

    /// Body text for the current step: one line per field, followed by the
    /// field's error when it is visible.
    pub fn body_lines(&self) -> Vec<String> {
        let wizard = &self.wizard;
        let schema = wizard.current_schema();
        let mut lines = vec![format!(
            "Step {} of {}: {}",
            wizard.current_step(),
            wizard.step_count(),
            schema.title
        )];
        for field in &schema.fields {
            let value = wizard.form().input(field.key);
            let shown = match field.kind {
                FieldKind::Secret => "*".repeat(value.chars().count()),
                _ => value,
            };
            let marker = if field.required { "*" } else { "" };
            lines.push(format!("{}{}: {}", field.label, marker, shown).trim_end().to_string());
            if let Some(message) = wizard.visible_error(field.key) {
                lines.push(format!("  ! {}", message));
            }
        }
        if wizard.is_submitting() {
            lines.push("Submitting...".to_string());
        }
        lines
    }

    fn confirm_label(&self) -> &'static str {
        if self.wizard.is_final_step() {
            self.flow.submit_label()
        } else {
            NEXT_LABEL
        }
    }

    fn require_open(&self, host: &ModalHost) -> Result<ModalHandle, ModalError> {
        self.handle
            .filter(|handle| host.is_open(*handle))
            .ok_or(ModalError::WizardClosed)
    }

    fn sync(&self, host: &mut ModalHost) -> Result<(), PortalError> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        host.set_status(handle, self.wizard.status())?;
        host.set_banner(handle, self.wizard.banner().map(str::to_string))?;
        host.set_body(handle, self.body_lines())?;
        host.set_confirm_label(handle, self.confirm_label())?;
        Ok(())
    }
}
