use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current value of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Choice(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FieldValue::Choice(value.into())
    }

    /// String form fed to validators and shown back in inputs.
    pub fn to_input(&self) -> String {
        match self {
            FieldValue::Text(value) | FieldValue::Choice(value) => value.clone(),
            FieldValue::Date(date) => date.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) | FieldValue::Choice(value) => value.trim().is_empty(),
            FieldValue::Date(_) => false,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Text(value) | FieldValue::Choice(value) => {
                NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_input())
    }
}

/// Field name to value mapping owned by a wizard instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Trimmed input string for `field`, empty when unset.
    pub fn input(&self, field: &str) -> String {
        self.values
            .get(field)
            .map(|value| value.to_input().trim().to_string())
            .unwrap_or_default()
    }

    /// Input string exactly as entered, empty when unset.
    pub fn raw(&self, field: &str) -> String {
        self.values
            .get(field)
            .map(FieldValue::to_input)
            .unwrap_or_default()
    }

    /// Like [`FormState::input`] but `None` for blank values.
    pub fn optional(&self, field: &str) -> Option<String> {
        let value = self.input(field);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.values.remove(field)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Field name to message mapping. Always derived from a [`FormState`] and a
/// step schema, never edited by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    errors: BTreeMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Keeps only the entries whose field satisfies `keep`.
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> ErrorMap {
        ErrorMap {
            errors: self
                .errors
                .iter()
                .filter(|(field, _)| keep(field))
                .map(|(field, message)| (field.clone(), message.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_values_render_as_iso() {
        let date = NaiveDate::from_ymd_opt(1990, 4, 2).unwrap();
        assert_eq!(FieldValue::Date(date).to_input(), "1990-04-02");
        assert_eq!(FieldValue::text("1990-04-02").as_date(), Some(date));
    }

    #[test]
    fn input_is_trimmed_and_optional_skips_blanks() {
        let form = FormState::new()
            .with("name", FieldValue::text("  Ada  "))
            .with("notes", FieldValue::text("   "));
        assert_eq!(form.input("name"), "Ada");
        assert_eq!(form.optional("notes"), None);
        assert_eq!(form.input("missing"), "");
    }

    #[test]
    fn error_map_filter_keeps_matching_fields() {
        let mut errors = ErrorMap::new();
        errors.insert("a", "first");
        errors.insert("b", "second");
        let only_b = errors.filtered(|field| field == "b");
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b.get("b"), Some("second"));
    }
}
