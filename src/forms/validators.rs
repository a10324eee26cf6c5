//! Per-field validation rules.
//!
//! Rules are pure and synchronous: given the candidate value (and, for
//! cross-field rules, the rest of the form) they either accept it or return
//! a human-readable message.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::state::{FieldValue, FormState, DATE_FORMAT};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

const PHONE_DIGITS: usize = 10;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Input widget a field is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text that must never be echoed back (passwords).
    Secret,
    Date,
    Choice(Vec<String>),
}

type RuleCallback = dyn Fn(&str, &FormState) -> Result<(), String> + Send + Sync;
type SharedRuleCallback = Arc<RuleCallback>;

/// A single constraint on a non-empty field value.
#[derive(Clone)]
pub enum Rule {
    Email,
    /// Exactly ten digits once formatting characters are ignored.
    Phone,
    Pattern {
        regex: Regex,
        message: String,
    },
    Integer,
    /// Inclusive numeric range.
    Range {
        min: f64,
        max: f64,
    },
    MinLength(usize),
    MaxLength(usize),
    /// Case-insensitive membership.
    OneOf(Vec<String>),
    Date,
    DateNotAfter(NaiveDate),
    DateNotBefore(NaiveDate),
    /// Cross-field equality, e.g. password confirmation.
    MatchesField {
        other: &'static str,
        message: String,
    },
    Custom(SharedRuleCallback),
}

impl Rule {
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Rule::Pattern {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    pub fn matches_field(other: &'static str, message: impl Into<String>) -> Self {
        Rule::MatchesField {
            other,
            message: message.into(),
        }
    }

    pub fn custom(
        check: impl Fn(&str, &FormState) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Rule::Custom(Arc::new(check))
    }

    fn check(
        &self,
        field: &FieldRule,
        input: &str,
        form: &FormState,
    ) -> Result<(), ValidationError> {
        let label = field.label;
        match self {
            Rule::Email => {
                if EMAIL_PATTERN.is_match(input) {
                    Ok(())
                } else {
                    Err(ValidationError::new("Enter a valid email address"))
                }
            }
            Rule::Phone => {
                let allowed = input
                    .chars()
                    .all(|ch| ch.is_ascii_digit() || matches!(ch, '(' | ')' | '-' | '.' | ' ' | '+'));
                let digits = input.chars().filter(char::is_ascii_digit).count();
                if allowed && digits == PHONE_DIGITS {
                    Ok(())
                } else {
                    Err(ValidationError::new("Enter a 10-digit phone number"))
                }
            }
            Rule::Pattern { regex, message } => {
                if regex.is_match(input) {
                    Ok(())
                } else {
                    Err(ValidationError::new(message.clone()))
                }
            }
            Rule::Integer => input.parse::<i64>().map(|_| ()).map_err(|_| {
                ValidationError::new(format!("{} must be a whole number", sentence_case(label)))
            }),
            Rule::Range { min, max } => {
                let value = input
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| {
                        ValidationError::new(format!("{} must be a number", sentence_case(label)))
                    })?;
                if value < *min || value > *max {
                    Err(ValidationError::new(format!(
                        "{} must be between {} and {}",
                        sentence_case(label),
                        format_number(*min),
                        format_number(*max)
                    )))
                } else {
                    Ok(())
                }
            }
            Rule::MinLength(min) => {
                if input.chars().count() < *min {
                    Err(ValidationError::new(format!(
                        "{} must be at least {} characters",
                        sentence_case(label),
                        min
                    )))
                } else {
                    Ok(())
                }
            }
            Rule::MaxLength(max) => {
                let count = input.chars().count();
                if count > *max {
                    Err(ValidationError::new(format!(
                        "{} cannot exceed {} characters (got {})",
                        sentence_case(label),
                        max,
                        count
                    )))
                } else {
                    Ok(())
                }
            }
            Rule::OneOf(options) => {
                if options
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(input))
                {
                    Ok(())
                } else {
                    Err(ValidationError::new(format!(
                        "{} must be one of: {}",
                        sentence_case(label),
                        options.join(", ")
                    )))
                }
            }
            Rule::Date => parse_date(input).map(|_| ()),
            Rule::DateNotAfter(max) => {
                let date = parse_date(input)?;
                if date > *max {
                    Err(ValidationError::new(format!(
                        "{} cannot be after {}",
                        sentence_case(label),
                        max.format(DATE_FORMAT)
                    )))
                } else {
                    Ok(())
                }
            }
            Rule::DateNotBefore(min) => {
                let date = parse_date(input)?;
                if date < *min {
                    Err(ValidationError::new(format!(
                        "{} must be on or after {}",
                        sentence_case(label),
                        min.format(DATE_FORMAT)
                    )))
                } else {
                    Ok(())
                }
            }
            Rule::MatchesField { other, message } => {
                if field.read(form, other) == input {
                    Ok(())
                } else {
                    Err(ValidationError::new(message.clone()))
                }
            }
            Rule::Custom(check) => check(input, form).map_err(ValidationError::new),
        }
    }
}

/// Declarative description of one form field and its rules.
#[derive(Clone)]
pub struct FieldRule {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    required_message: Option<String>,
    rules: Vec<Rule>,
}

impl FieldRule {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            required_message: None,
            rules: Vec::new(),
        }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Secret)
    }

    pub fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date).with_rule(Rule::Date)
    }

    pub fn choice(key: &'static str, label: &'static str, options: &[&str]) -> Self {
        let options: Vec<String> = options.iter().map(|option| option.to_string()).collect();
        Self::new(key, label, FieldKind::Choice(options.clone())).with_rule(Rule::OneOf(options))
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = Some(message.into());
        self
    }

    pub fn required_message(&self) -> String {
        self.required_message
            .clone()
            .unwrap_or_else(|| format!("{} is required", sentence_case(self.label)))
    }

    /// Converts raw user input into the value type this field stores.
    pub fn parse_input(&self, raw: &str) -> FieldValue {
        match &self.kind {
            FieldKind::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(FieldValue::Date)
                .unwrap_or_else(|_| FieldValue::text(raw)),
            FieldKind::Choice(options) => options
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(raw.trim()))
                .map(|candidate| FieldValue::choice(candidate.clone()))
                .unwrap_or_else(|| FieldValue::choice(raw.trim())),
            FieldKind::Text | FieldKind::Secret => FieldValue::text(raw),
        }
    }

    /// Blank optional fields always pass; blank required fields fail with
    /// the required message; otherwise the first failing rule wins.
    /// Reads `key` the way this field reads its own value: secrets keep
    /// surrounding whitespace, everything else is trimmed.
    pub fn read(&self, form: &FormState, key: &str) -> String {
        match self.kind {
            FieldKind::Secret => form.raw(key),
            _ => form.input(key),
        }
    }

    pub fn validate(&self, form: &FormState) -> Result<(), ValidationError> {
        let input = self.read(form, self.key);
        if input.trim().is_empty() {
            return if self.required {
                Err(ValidationError::new(self.required_message()))
            } else {
                Ok(())
            };
        }
        for rule in &self.rules {
            rule.check(self, &input, form)?;
        }
        Ok(())
    }
}

/// "Full Name" -> "Full name".
fn sentence_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| ValidationError::new("Use YYYY-MM-DD format"))
}

fn format_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(key: &str, value: &str) -> FormState {
        FormState::new().with(key, FieldValue::text(value))
    }

    #[test]
    fn required_fields_reject_blank_and_whitespace() {
        let field = FieldRule::text("full_name", "Full Name");
        for blank in ["", "   ", "\t\n"] {
            let err = field.validate(&form_with("full_name", blank)).unwrap_err();
            assert_eq!(err.message, "Full name is required");
        }
        let err = field.validate(&FormState::new()).unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn optional_fields_accept_blank_but_still_check_content() {
        let field = FieldRule::text("notes", "Notes")
            .with_optional()
            .with_rule(Rule::MaxLength(5));
        assert!(field.validate(&form_with("notes", "  ")).is_ok());
        assert!(field.validate(&form_with("notes", "short")).is_ok());
        let err = field.validate(&form_with("notes", "too long")).unwrap_err();
        assert_eq!(err.message, "Notes cannot exceed 5 characters (got 8)");
    }

    #[test]
    fn custom_required_message_overrides_default() {
        let field = FieldRule::text("zip", "ZIP").with_required_message("ZIP code is required");
        let err = field.validate(&FormState::new()).unwrap_err();
        assert_eq!(err.message, "ZIP code is required");
    }

    #[test]
    fn email_and_phone_formats() {
        let email = FieldRule::text("email", "Email").with_rule(Rule::Email);
        assert!(email.validate(&form_with("email", "ada@clinic.io")).is_ok());
        assert!(email.validate(&form_with("email", "ada@clinic")).is_err());

        let phone = FieldRule::text("phone", "Phone").with_rule(Rule::Phone);
        assert!(phone.validate(&form_with("phone", "(312) 555-1234")).is_ok());
        assert!(phone.validate(&form_with("phone", "3125551234")).is_ok());
        assert!(phone.validate(&form_with("phone", "312555123")).is_err());
        assert!(phone.validate(&form_with("phone", "312-555-12a4")).is_err());
    }

    #[test]
    fn range_and_integer_rules() {
        let quantity = FieldRule::text("quantity", "Quantity")
            .with_rule(Rule::Integer)
            .with_rule(Rule::Range { min: 1.0, max: 500.0 });
        assert!(quantity.validate(&form_with("quantity", "12")).is_ok());
        assert_eq!(
            quantity
                .validate(&form_with("quantity", "1.5"))
                .unwrap_err()
                .message,
            "Quantity must be a whole number"
        );
        assert_eq!(
            quantity
                .validate(&form_with("quantity", "900"))
                .unwrap_err()
                .message,
            "Quantity must be between 1 and 500"
        );
    }

    #[test]
    fn range_rejects_non_finite_numbers() {
        let dose = FieldRule::text("dose", "Dose").with_rule(Rule::Range { min: 0.5, max: 10.0 });
        for input in ["NaN", "nan", "inf", "-infinity"] {
            assert_eq!(
                dose.validate(&form_with("dose", input)).unwrap_err().message,
                "Dose must be a number",
                "{input}"
            );
        }
        assert!(dose.validate(&form_with("dose", "2.5")).is_ok());
    }

    #[test]
    fn choice_fields_are_case_insensitive_and_canonicalised() {
        let field = FieldRule::choice("channel", "Preferred contact", &["Email", "Phone"]);
        assert_eq!(field.parse_input("email"), FieldValue::choice("Email"));
        let form = FormState::new().with("channel", field.parse_input("PHONE"));
        assert!(field.validate(&form).is_ok());
        let form = FormState::new().with("channel", field.parse_input("fax"));
        assert_eq!(
            field.validate(&form).unwrap_err().message,
            "Preferred contact must be one of: Email, Phone"
        );
    }

    #[test]
    fn date_rules_parse_and_bound() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let field = FieldRule::date("dob", "Date of birth").with_rule(Rule::DateNotAfter(today));
        assert_eq!(
            field.parse_input("2000-01-31"),
            FieldValue::Date(NaiveDate::from_ymd_opt(2000, 1, 31).unwrap())
        );
        let form = FormState::new().with("dob", field.parse_input("31/01/2000"));
        assert_eq!(
            field.validate(&form).unwrap_err().message,
            "Use YYYY-MM-DD format"
        );
        let form = FormState::new().with("dob", field.parse_input("2030-01-01"));
        assert_eq!(
            field.validate(&form).unwrap_err().message,
            "Date of birth cannot be after 2024-06-01"
        );
    }

    #[test]
    fn cross_field_rule_compares_against_other_field() {
        let confirm = FieldRule::secret("confirm_password", "Confirm password")
            .with_rule(Rule::matches_field("password", "Passwords must match"));
        let form = FormState::new()
            .with("password", FieldValue::text("s3cretpass"))
            .with("confirm_password", FieldValue::text("s3cretpas"));
        assert_eq!(
            confirm.validate(&form).unwrap_err().message,
            "Passwords must match"
        );
        let form = form.with("confirm_password", FieldValue::text("s3cretpass"));
        assert!(confirm.validate(&form).is_ok());
    }

    #[test]
    fn first_failing_rule_wins() {
        let field = FieldRule::text("code", "Code")
            .with_rule(Rule::MinLength(4))
            .with_rule(Rule::pattern(r"^\d+$", "Digits only").unwrap());
        assert_eq!(
            field.validate(&form_with("code", "ab")).unwrap_err().message,
            "Code must be at least 4 characters"
        );
        assert_eq!(
            field.validate(&form_with("code", "abcd")).unwrap_err().message,
            "Digits only"
        );
    }

    #[test]
    fn custom_rules_see_the_whole_form() {
        let field = FieldRule::text("end", "End").with_rule(Rule::custom(|input, form| {
            if input > form.input("start").as_str() {
                Ok(())
            } else {
                Err("End must come after start".into())
            }
        }));
        let form = FormState::new()
            .with("start", FieldValue::text("b"))
            .with("end", FieldValue::text("a"));
        assert!(field.validate(&form).is_err());
    }
}
