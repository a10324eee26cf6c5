//! Wizard controller: the step state machine behind every multi-step form.
//!
//! The controller owns the form values, the derived error map and the
//! touched set for one wizard instance. Hosts drive it with input events
//! (`input`, `blur`) and navigation (`next`, `back`, `begin_submit`).
//!
//! Submission is split in two so an event loop can await the remote call:
//! [`WizardController::begin_submit`] hands out a [`SubmitTicket`] and moves
//! the wizard into [`WizardPhase::Submitting`]; the host later reports the
//! result through [`WizardController::finish_submit`]. Resetting the wizard
//! invalidates outstanding tickets, so a response that arrives after the
//! modal closed is discarded instead of mutating a fresh session.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{SubmissionError, WizardError};
use crate::modal::FormStatus;

use super::schema::{SchemaRegistry, StepSchema};
use super::state::{ErrorMap, FieldValue, FormState};
use super::touched::TouchedSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardPhase {
    /// Editing the given 1-based step.
    Step(usize),
    Submitting,
    Completed,
    /// Last submission failed; the final step is shown again with a banner.
    Failed { message: String },
}

/// Result of [`WizardController::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { to: usize },
    Blocked { invalid: usize },
    /// Final step is valid; the host should submit.
    ReadyToSubmit,
}

/// Result of [`WizardController::begin_submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAttempt {
    Started(SubmitTicket),
    Blocked { invalid: usize },
}

/// Proof that a submission was started by a specific wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    wizard: Uuid,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// Validation stopped the submission before it started.
    Blocked { invalid: usize },
    Completed(T),
    Failed(SubmissionError),
    /// The wizard was reset while the call was in flight.
    Discarded,
}

pub struct WizardController {
    id: Uuid,
    registry: SchemaRegistry,
    defaults: FormState,
    form: FormState,
    errors: ErrorMap,
    touched: TouchedSet,
    phase: WizardPhase,
    generation: u64,
}

impl WizardController {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_defaults(registry, FormState::new())
    }

    /// `defaults` pre-populate the form on every (re)open without marking
    /// anything touched.
    pub fn with_defaults(registry: SchemaRegistry, defaults: FormState) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry,
            form: defaults.clone(),
            defaults,
            errors: ErrorMap::new(),
            touched: TouchedSet::new(),
            phase: WizardPhase::Step(1),
            generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.registry.name()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn step_count(&self) -> usize {
        self.registry.step_count()
    }

    /// Step shown to the user; the final step while submitting or failed.
    pub fn current_step(&self) -> usize {
        match self.phase {
            WizardPhase::Step(step) => step,
            _ => self.registry.step_count(),
        }
    }

    pub fn current_schema(&self) -> &StepSchema {
        &self.registry.steps()[self.current_step() - 1]
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step() == 1
    }

    pub fn is_final_step(&self) -> bool {
        self.current_step() == self.registry.step_count()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }

    pub fn is_completed(&self) -> bool {
        self.phase == WizardPhase::Completed
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn touched(&self) -> &TouchedSet {
        &self.touched
    }

    /// Errors the user should see: present in the error map and touched.
    pub fn visible_errors(&self) -> ErrorMap {
        self.errors.filtered(|field| self.touched.is_touched(field))
    }

    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.touched.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn banner(&self) -> Option<&str> {
        match &self.phase {
            WizardPhase::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> FormStatus {
        FormStatus {
            invalid: !self.visible_errors().is_empty(),
            submitting: self.is_submitting(),
        }
    }

    /// Fresh session: defaults restored, errors and touched cleared, back to
    /// step 1. Any in-flight ticket becomes stale.
    pub fn reset(&mut self) {
        if self.is_submitting() {
            debug!(wizard = self.name(), "abandoning in-flight submission");
        }
        self.generation += 1;
        self.form = self.defaults.clone();
        self.errors.clear();
        self.touched.reset_for_step();
        self.phase = WizardPhase::Step(1);
        debug!(wizard = self.name(), generation = self.generation, "wizard reset");
    }

    /// Sets a value without counting it as user interaction.
    pub fn prefill(&mut self, field: &str, value: FieldValue) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_declared(field)?;
        self.form.set(field, value);
        Ok(())
    }

    /// Records an edit; the field counts as touched when it belongs to the
    /// current step.
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_declared(field)?;
        self.form.set(field, value);
        if self.current_schema().declares(field) {
            self.touched.mark_touched(field);
        }
        self.revalidate();
        Ok(())
    }

    /// Parses raw text with the field's kind, then behaves like
    /// [`WizardController::set_value`].
    pub fn input(&mut self, field: &str, raw: &str) -> Result<(), WizardError> {
        let value = self
            .registry
            .field(field)
            .map(|rule| rule.parse_input(raw))
            .ok_or_else(|| WizardError::UnknownField(field.to_string()))?;
        self.set_value(field, value)
    }

    pub fn clear_value(&mut self, field: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_declared(field)?;
        self.form.remove(field);
        if self.current_schema().declares(field) {
            self.touched.mark_touched(field);
        }
        self.revalidate();
        Ok(())
    }

    pub fn blur(&mut self, field: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.ensure_declared(field)?;
        if self.current_schema().declares(field) {
            self.touched.mark_touched(field);
        }
        self.revalidate();
        Ok(())
    }

    pub fn next(&mut self) -> Result<Advance, WizardError> {
        self.ensure_editable()?;
        let step = self.current_step();
        if let Some(invalid) = self.block_on_errors() {
            debug!(wizard = self.name(), step, invalid, "advance blocked");
            return Ok(Advance::Blocked { invalid });
        }
        if step < self.registry.step_count() {
            self.enter_step(step + 1);
            Ok(Advance::Moved { to: step + 1 })
        } else {
            Ok(Advance::ReadyToSubmit)
        }
    }

    /// Moves one step back, discarding the errors of the step being left.
    /// A no-op on the first step.
    pub fn back(&mut self) -> Result<usize, WizardError> {
        self.ensure_editable()?;
        let step = self.current_step();
        if step > 1 {
            self.enter_step(step - 1);
            Ok(step - 1)
        } else {
            Ok(step)
        }
    }

    pub fn begin_submit(&mut self) -> Result<SubmitAttempt, WizardError> {
        match self.phase {
            WizardPhase::Submitting => return Err(WizardError::SubmitInFlight),
            WizardPhase::Completed => return Err(WizardError::AlreadyCompleted),
            _ => {}
        }
        let current = self.current_step();
        let total = self.registry.step_count();
        if current < total {
            warn!(wizard = self.name(), current, total, "submit before final step");
            return Err(WizardError::NotFinalStep { current, total });
        }
        if let Some(invalid) = self.block_on_errors() {
            debug!(wizard = self.name(), invalid, "submit blocked");
            return Ok(SubmitAttempt::Blocked { invalid });
        }
        self.phase = WizardPhase::Submitting;
        debug!(wizard = self.name(), generation = self.generation, "submitting");
        Ok(SubmitAttempt::Started(SubmitTicket {
            wizard: self.id,
            generation: self.generation,
        }))
    }

    pub fn finish_submit<T>(
        &mut self,
        ticket: SubmitTicket,
        result: Result<T, SubmissionError>,
    ) -> Result<SubmitOutcome<T>, WizardError> {
        if ticket.wizard != self.id {
            warn!(wizard = self.name(), "submission ticket from another wizard");
            return Err(WizardError::ForeignTicket);
        }
        if ticket.generation != self.generation {
            debug!(
                wizard = self.name(),
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale submission result"
            );
            return Ok(SubmitOutcome::Discarded);
        }
        if !self.is_submitting() {
            return Err(WizardError::NothingInFlight);
        }
        match result {
            Ok(entity) => {
                self.phase = WizardPhase::Completed;
                info!(wizard = self.name(), "wizard completed");
                Ok(SubmitOutcome::Completed(entity))
            }
            Err(err) => {
                warn!(wizard = self.name(), error = %err, "submission failed");
                self.phase = WizardPhase::Failed {
                    message: err.message.clone(),
                };
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }

    /// Runs both submission phases around a synchronous call.
    pub fn submit_with<T>(
        &mut self,
        call: impl FnOnce(&FormState) -> Result<T, SubmissionError>,
    ) -> Result<SubmitOutcome<T>, WizardError> {
        match self.begin_submit()? {
            SubmitAttempt::Blocked { invalid } => Ok(SubmitOutcome::Blocked { invalid }),
            SubmitAttempt::Started(ticket) => {
                let result = call(&self.form);
                self.finish_submit(ticket, result)
            }
        }
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.phase {
            WizardPhase::Submitting => Err(WizardError::Busy),
            WizardPhase::Completed => Err(WizardError::AlreadyCompleted),
            _ => Ok(()),
        }
    }

    fn ensure_declared(&self, field: &str) -> Result<(), WizardError> {
        if self.registry.step_of(field).is_some() {
            Ok(())
        } else {
            warn!(wizard = self.name(), field, "unknown field");
            Err(WizardError::UnknownField(field.to_string()))
        }
    }

    fn revalidate(&mut self) {
        self.errors = self.current_schema().validate(&self.form);
    }

    /// Validates the current step; on failure every offending field becomes
    /// touched so all blocking issues show at once.
    fn block_on_errors(&mut self) -> Option<usize> {
        let errors = self.current_schema().validate(&self.form);
        if errors.is_empty() {
            self.errors.clear();
            return None;
        }
        self.touched.touch_all(errors.fields().map(str::to_string));
        let invalid = errors.len();
        self.errors = errors;
        Some(invalid)
    }

    fn enter_step(&mut self, step: usize) {
        self.phase = WizardPhase::Step(step);
        self.errors.clear();
        self.touched.reset_for_step();
        debug!(wizard = self.name(), step, "entered step");
    }
}
