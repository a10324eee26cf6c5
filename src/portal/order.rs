use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::display::OrderStatus;
use crate::errors::{SubmissionError, WizardError};
use crate::forms::{FieldRule, FieldValue, FormFlow, FormState, Rule, SchemaRegistry, StepSchema};

pub const MAX_ORDER_QUANTITY: f64 = 500.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub unit_price_cents: u64,
    pub stock: u32,
}

impl Product {
    pub fn price_label(&self) -> String {
        format_cents(self.unit_price_cents)
    }
}

pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub clinic: String,
    pub sku: String,
    pub quantity: u32,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicOrder {
    pub id: Uuid,
    pub clinic: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub total_cents: u64,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Two-step clinic order: where and when, then what and how many.
#[derive(Debug, Clone)]
pub struct ClinicOrderForm {
    clinics: Vec<String>,
    catalog: Vec<Product>,
    today: NaiveDate,
}

impl ClinicOrderForm {
    pub fn new(clinics: Vec<String>, catalog: Vec<Product>, today: NaiveDate) -> Self {
        Self {
            clinics,
            catalog,
            today,
        }
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    fn product_named(&self, name: &str) -> Option<&Product> {
        find_product(&self.catalog, name)
    }
}

fn find_product<'a>(catalog: &'a [Product], name: &str) -> Option<&'a Product> {
    catalog
        .iter()
        .find(|product| product.name.eq_ignore_ascii_case(name.trim()))
}

impl FormFlow for ClinicOrderForm {
    type Draft = OrderDraft;

    fn title(&self) -> &'static str {
        "New Clinic Order"
    }

    fn registry(&self) -> Result<SchemaRegistry, WizardError> {
        let clinics: Vec<&str> = self.clinics.iter().map(String::as_str).collect();
        let products: Vec<&str> = self.catalog.iter().map(|p| p.name.as_str()).collect();
        let catalog = self.catalog.clone();
        let within_stock = Rule::custom(move |input, form| {
            let Ok(quantity) = input.parse::<u32>() else {
                return Ok(());
            };
            match find_product(&catalog, &form.input("product")) {
                Some(product) if quantity > product.stock => Err(format!(
                    "Only {} units of {} in stock",
                    product.stock, product.name
                )),
                _ => Ok(()),
            }
        });
        SchemaRegistry::new(
            "clinic_order",
            vec![
                StepSchema::new(
                    "Delivery",
                    vec![
                        FieldRule::choice("clinic", "Clinic", &clinics),
                        FieldRule::date("delivery_date", "Delivery Date")
                            .with_rule(Rule::DateNotBefore(self.today)),
                    ],
                ),
                StepSchema::new(
                    "Items",
                    vec![
                        FieldRule::choice("product", "Product", &products),
                        FieldRule::text("quantity", "Quantity")
                            .with_rule(Rule::Integer)
                            .with_rule(Rule::Range {
                                min: 1.0,
                                max: MAX_ORDER_QUANTITY,
                            })
                            .with_rule(within_stock),
                        FieldRule::text("notes", "Notes")
                            .with_optional()
                            .with_rule(Rule::MaxLength(250)),
                    ],
                ),
            ],
        )
    }

    fn submit_label(&self) -> &'static str {
        "Place Order"
    }

    fn commit(&self, values: &FormState) -> Result<OrderDraft, SubmissionError> {
        let product = self
            .product_named(&values.input("product"))
            .ok_or_else(|| SubmissionError::new("Selected product is no longer available"))?;
        let quantity = values
            .input("quantity")
            .parse::<u32>()
            .map_err(|_| SubmissionError::new("Quantity must be a whole number"))?;
        let delivery_date = values
            .get("delivery_date")
            .and_then(FieldValue::as_date)
            .ok_or_else(|| SubmissionError::new("Delivery date is missing"))?;
        Ok(OrderDraft {
            clinic: values.input("clinic"),
            sku: product.sku.clone(),
            quantity,
            delivery_date,
            notes: values.optional("notes"),
        })
    }
}
