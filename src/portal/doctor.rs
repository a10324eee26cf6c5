use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::display::phone::format_phone;
use crate::display::AccountStatus;
use crate::errors::{SubmissionError, WizardError};
use crate::forms::{FieldRule, FormFlow, FormState, Rule, SchemaRegistry, StepSchema};

pub const SPECIALTIES: [&str; 6] = [
    "Dermatology",
    "Endocrinology",
    "Family Medicine",
    "Internal Medicine",
    "Nutrition",
    "Pediatrics",
];

static LICENSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z]{2}-\d{6}$").expect("license pattern compiles"));

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, PartialEq, Eq)]
pub struct DoctorDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub license_number: String,
    pub password: String,
}

impl fmt::Debug for DoctorDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoctorDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("specialty", &self.specialty)
            .field("license_number", &self.license_number)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub license_number: String,
    /// New doctors wait for admin approval.
    pub status: AccountStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Single-step Add Doctor form with password confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoctorForm;

fn password_strength(input: &str, _form: &FormState) -> Result<(), String> {
    let has_letter = input.chars().any(char::is_alphabetic);
    let has_digit = input.chars().any(|ch| ch.is_ascii_digit());
    if has_letter && has_digit {
        Ok(())
    } else {
        Err("Password must contain a letter and a number".to_string())
    }
}

impl FormFlow for DoctorForm {
    type Draft = DoctorDraft;

    fn title(&self) -> &'static str {
        "Add Doctor"
    }

    fn registry(&self) -> Result<SchemaRegistry, WizardError> {
        SchemaRegistry::single(
            "doctor",
            StepSchema::new(
                "Doctor details",
                vec![
                    FieldRule::text("name", "Full Name").with_rule(Rule::MinLength(2)),
                    FieldRule::text("email", "Email").with_rule(Rule::Email),
                    FieldRule::text("phone", "Phone").with_rule(Rule::Phone),
                    FieldRule::choice("specialty", "Specialty", &SPECIALTIES),
                    FieldRule::text("license_number", "License Number")
                        .with_rule(Rule::Pattern {
                            regex: LICENSE_PATTERN.clone(),
                            message: "License numbers look like AB-123456".to_string(),
                        })
                        .with_help("State code, dash, six digits"),
                    FieldRule::secret("password", "Password")
                        .with_rule(Rule::MinLength(MIN_PASSWORD_LENGTH))
                        .with_rule(Rule::custom(password_strength)),
                    FieldRule::secret("confirm_password", "Confirm Password")
                        .with_required_message("Please confirm the password")
                        .with_rule(Rule::matches_field("password", "Passwords must match")),
                ],
            ),
        )
    }

    fn submit_label(&self) -> &'static str {
        "Create Doctor"
    }

    fn commit(&self, values: &FormState) -> Result<DoctorDraft, SubmissionError> {
        Ok(DoctorDraft {
            name: values.input("name"),
            email: values.input("email").to_ascii_lowercase(),
            phone: format_phone(&values.input("phone")),
            specialty: values.input("specialty"),
            license_number: values.input("license_number").to_ascii_uppercase(),
            password: values.raw("password"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldValue;

    #[test]
    fn password_rules_apply_in_order() {
        let registry = DoctorForm.registry().unwrap();
        let password = registry.field("password").unwrap();
        let short = FormState::new().with("password", FieldValue::text("abc1"));
        assert_eq!(
            password.validate(&short).unwrap_err().message,
            "Password must be at least 8 characters"
        );
        let letters = FormState::new().with("password", FieldValue::text("abcdefgh"));
        assert_eq!(
            password.validate(&letters).unwrap_err().message,
            "Password must contain a letter and a number"
        );
    }

    #[test]
    fn confirmation_must_match() {
        let registry = DoctorForm.registry().unwrap();
        let confirm = registry.field("confirm_password").unwrap();
        let form = FormState::new()
            .with("password", FieldValue::text("secret123"))
            .with("confirm_password", FieldValue::text("secret124"));
        assert_eq!(confirm.validate(&form).unwrap_err().message, "Passwords must match");
        assert_eq!(
            confirm.validate(&FormState::new()).unwrap_err().message,
            "Please confirm the password"
        );
    }

    #[test]
    fn passwords_keep_surrounding_spaces() {
        let registry = DoctorForm.registry().unwrap();
        let confirm = registry.field("confirm_password").unwrap();
        let form = FormState::new()
            .with("password", FieldValue::text(" secret123 "))
            .with("confirm_password", FieldValue::text("secret123"));
        assert_eq!(confirm.validate(&form).unwrap_err().message, "Passwords must match");

        let form = FormState::new()
            .with("name", FieldValue::text("Dr. Rivera"))
            .with("email", FieldValue::text("Rivera@Example.com"))
            .with("phone", FieldValue::text("3125551234"))
            .with("specialty", FieldValue::choice("Nutrition"))
            .with("license_number", FieldValue::text("il-123456"))
            .with("password", FieldValue::text(" secret123 "))
            .with("confirm_password", FieldValue::text(" secret123 "));
        assert!(confirm.validate(&form).is_ok());
        let draft = DoctorForm.commit(&form).unwrap();
        assert_eq!(draft.password, " secret123 ");
        assert_eq!(draft.email, "rivera@example.com");

        let blank = FormState::new().with("password", FieldValue::text("   "));
        assert_eq!(
            registry.field("password").unwrap().validate(&blank).unwrap_err().message,
            "Password is required"
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let draft = DoctorDraft {
            name: "Dr. Rivera".into(),
            email: "rivera@example.com".into(),
            phone: "(312) 555-1234".into(),
            specialty: "Nutrition".into(),
            license_number: "IL-123456".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{:?}", draft).contains("hunter22"));
    }
}
