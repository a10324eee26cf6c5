use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::display::phone::format_phone;
use crate::display::AccountStatus;
use crate::errors::{SubmissionError, WizardError};
use crate::forms::{FieldRule, FieldValue, FormFlow, FormState, Rule, SchemaRegistry, StepSchema};

static STATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("state pattern compiles"));
static ZIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Email,
    Phone,
    Sms,
}

impl ContactChannel {
    pub const ALL: [ContactChannel; 3] = [ContactChannel::Email, ContactChannel::Phone, ContactChannel::Sms];

    pub fn label(self) -> &'static str {
        match self {
            ContactChannel::Email => "Email",
            ContactChannel::Phone => "Phone",
            ContactChannel::Sms => "SMS",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.label().eq_ignore_ascii_case(label.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Values collected by the customer wizard; `id` is set when editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Address,
    pub preferred_contact: Option<ContactChannel>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Address,
    pub preferred_contact: Option<ContactChannel>,
    pub notes: Option<String>,
    pub status: AccountStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Three-step Add/Edit Customer wizard.
#[derive(Debug, Clone)]
pub struct CustomerForm {
    today: NaiveDate,
    existing: Option<Customer>,
}

impl CustomerForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            existing: None,
        }
    }

    pub fn edit(customer: Customer, today: NaiveDate) -> Self {
        Self {
            today,
            existing: Some(customer),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.existing.is_some()
    }
}

impl FormFlow for CustomerForm {
    type Draft = CustomerDraft;

    fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit Customer"
        } else {
            "Add Customer"
        }
    }

    fn registry(&self) -> Result<SchemaRegistry, WizardError> {
        let contact_options: Vec<&str> = ContactChannel::ALL.iter().map(|c| c.label()).collect();
        SchemaRegistry::new(
            "customer",
            vec![
                StepSchema::new(
                    "Personal details",
                    vec![
                        FieldRule::text("full_name", "Full Name").with_rule(Rule::MinLength(2)),
                        FieldRule::text("email", "Email").with_rule(Rule::Email),
                        FieldRule::text("phone", "Phone")
                            .with_rule(Rule::Phone)
                            .with_help("10 digits, formatting is optional"),
                        FieldRule::date("date_of_birth", "Date of Birth")
                            .with_optional()
                            .with_rule(Rule::DateNotAfter(self.today))
                            .with_help("YYYY-MM-DD"),
                    ],
                ),
                StepSchema::new(
                    "Address",
                    vec![
                        FieldRule::text("street", "Street"),
                        FieldRule::text("city", "City"),
                        FieldRule::text("state", "State").with_rule(Rule::Pattern {
                            regex: STATE_PATTERN.clone(),
                            message: "Use the two-letter state code".to_string(),
                        }),
                        FieldRule::text("zip", "ZIP Code")
                            .with_required_message("ZIP code is required")
                            .with_rule(Rule::Pattern {
                                regex: ZIP_PATTERN.clone(),
                                message: "Enter a 5-digit ZIP code".to_string(),
                            }),
                    ],
                ),
                StepSchema::new(
                    "Preferences",
                    vec![
                        FieldRule::choice("preferred_contact", "Preferred Contact", &contact_options)
                            .with_optional(),
                        FieldRule::text("notes", "Notes")
                            .with_optional()
                            .with_rule(Rule::MaxLength(500)),
                    ],
                ),
            ],
        )
    }

    fn defaults(&self) -> FormState {
        let Some(customer) = &self.existing else {
            return FormState::new();
        };
        let mut form = FormState::new()
            .with("full_name", FieldValue::text(&customer.full_name))
            .with("email", FieldValue::text(&customer.email))
            .with("phone", FieldValue::text(&customer.phone))
            .with("street", FieldValue::text(&customer.address.street))
            .with("city", FieldValue::text(&customer.address.city))
            .with("state", FieldValue::text(&customer.address.state))
            .with("zip", FieldValue::text(&customer.address.zip));
        if let Some(date) = customer.date_of_birth {
            form.set("date_of_birth", FieldValue::Date(date));
        }
        if let Some(channel) = customer.preferred_contact {
            form.set("preferred_contact", FieldValue::choice(channel.label()));
        }
        if let Some(notes) = &customer.notes {
            form.set("notes", FieldValue::text(notes));
        }
        form
    }

    fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Save Changes"
        } else {
            "Create Customer"
        }
    }

    fn commit(&self, values: &FormState) -> Result<CustomerDraft, SubmissionError> {
        Ok(CustomerDraft {
            id: self.existing.as_ref().map(|customer| customer.id),
            full_name: values.input("full_name"),
            email: values.input("email").to_ascii_lowercase(),
            phone: format_phone(&values.input("phone")),
            date_of_birth: values.get("date_of_birth").and_then(FieldValue::as_date),
            address: Address {
                street: values.input("street"),
                city: values.input("city"),
                state: values.input("state").to_ascii_uppercase(),
                zip: values.input("zip"),
            },
            preferred_contact: values
                .optional("preferred_contact")
                .and_then(|label| ContactChannel::from_label(&label)),
            notes: values.optional("notes"),
        })
    }
}
