//! Multi-step form wizard with incremental validation.

pub mod flow;
pub mod schema;
pub mod state;
pub mod touched;
pub mod validators;
pub mod wizard;

pub use flow::FormFlow;
pub use schema::{SchemaRegistry, StepSchema};
pub use state::{ErrorMap, FieldValue, FormState};
pub use touched::TouchedSet;
pub use validators::{FieldKind, FieldRule, Rule, ValidationError};
pub use wizard::{Advance, SubmitAttempt, SubmitOutcome, SubmitTicket, WizardController, WizardPhase};
