use crate::errors::{SubmissionError, WizardError};

use super::schema::SchemaRegistry;
use super::state::FormState;

/// High-level contract for entity-specific wizards.
///
/// Implementations describe their steps, supply defaults (when editing an
/// existing record), and turn collected values into the draft sent to the
/// remote API once the final step validates.
pub trait FormFlow {
    type Draft;

    /// Title shown in the hosting modal.
    fn title(&self) -> &'static str;

    /// Step schemas controlling field order and gating.
    fn registry(&self) -> Result<SchemaRegistry, WizardError>;

    /// Values used to pre-populate each fresh session.
    fn defaults(&self) -> FormState {
        FormState::new()
    }

    /// Label of the confirm button on the final step.
    fn submit_label(&self) -> &'static str {
        "Submit"
    }

    /// Builds the draft after the final step validated.
    fn commit(&self, values: &FormState) -> Result<Self::Draft, SubmissionError>;
}
