use std::collections::HashSet;

use crate::errors::WizardError;

use super::state::{ErrorMap, FormState};
use super::validators::FieldRule;

/// The subset of field rules that gate one wizard step.
#[derive(Clone)]
pub struct StepSchema {
    pub title: &'static str,
    pub fields: Vec<FieldRule>,
}

impl StepSchema {
    pub fn new(title: &'static str, fields: Vec<FieldRule>) -> Self {
        Self { title, fields }
    }

    /// Every invalid field of this step, keyed by field name.
    pub fn validate(&self, form: &FormState) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for field in &self.fields {
            if let Err(err) = field.validate(form) {
                errors.insert(field.key, err.message);
            }
        }
        errors
    }

    pub fn field(&self, key: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn declares(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }
}

/// Ordered step schemas for one wizard. Steps are addressed 1-based.
#[derive(Clone)]
pub struct SchemaRegistry {
    name: &'static str,
    steps: Vec<StepSchema>,
}

impl SchemaRegistry {
    pub fn new(name: &'static str, steps: Vec<StepSchema>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        let mut seen = HashSet::new();
        for key in steps.iter().flat_map(StepSchema::keys) {
            if !seen.insert(key) {
                return Err(WizardError::DuplicateField(key.to_string()));
            }
        }
        Ok(Self { name, steps })
    }

    /// Single-step registry for plain modal forms.
    pub fn single(name: &'static str, step: StepSchema) -> Result<Self, WizardError> {
        Self::new(name, vec![step])
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepSchema] {
        &self.steps
    }

    pub fn schema_for(&self, step: usize) -> Result<&StepSchema, WizardError> {
        step.checked_sub(1)
            .and_then(|index| self.steps.get(index))
            .ok_or(WizardError::StepOutOfRange {
                step,
                total: self.steps.len(),
            })
    }

    /// 1-based step declaring `key`.
    pub fn step_of(&self, key: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.declares(key))
            .map(|index| index + 1)
    }

    pub fn field(&self, key: &str) -> Option<&FieldRule> {
        self.steps.iter().find_map(|step| step.field(key))
    }
}
