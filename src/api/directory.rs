//! In-process stand-in for the remote data API.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::display::import::ImportReport;
use crate::display::{AccountStatus, OrderStatus};
use crate::errors::SubmissionError;
use crate::portal::{ClinicOrder, Customer, CustomerDraft, Doctor, DoctorDraft, OrderDraft, Product};

use super::Submitter;

#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    customers: Vec<Customer>,
    doctors: Vec<Doctor>,
    orders: Vec<ClinicOrder>,
    clinics: Vec<String>,
    catalog: Vec<Product>,
    pending_failure: Option<String>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory with a couple of clinics and products, used by the CLI.
    pub fn demo() -> Self {
        let mut directory = Self::new();
        directory.clinics = vec![
            "Lakeview Clinic".to_string(),
            "Northside Family Health".to_string(),
            "Riverside Wellness".to_string(),
        ];
        directory.catalog = vec![
            Product {
                sku: "GZ-100".to_string(),
                name: "Sterile Gauze".to_string(),
                unit_price_cents: 450,
                stock: 200,
            },
            Product {
                sku: "GL-200".to_string(),
                name: "Nitrile Gloves".to_string(),
                unit_price_cents: 1299,
                stock: 80,
            },
            Product {
                sku: "SY-300".to_string(),
                name: "Syringe Pack".to_string(),
                unit_price_cents: 2450,
                stock: 35,
            },
        ];
        directory
    }

    pub fn with_clinics(mut self, clinics: Vec<String>) -> Self {
        self.clinics = clinics;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<Product>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Adds the accepted rows of an import; existing SKUs are replaced.
    pub fn load_products(&mut self, report: &ImportReport) -> usize {
        for product in &report.accepted {
            match self.catalog.iter_mut().find(|existing| existing.sku == product.sku) {
                Some(existing) => *existing = product.clone(),
                None => self.catalog.push(product.clone()),
            }
        }
        report.accepted.len()
    }

    /// Makes the next submission fail with `message`, like a server error.
    pub fn fail_next(&mut self, message: impl Into<String>) {
        self.pending_failure = Some(message.into());
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn orders(&self) -> &[ClinicOrder] {
        &self.orders
    }

    pub fn clinics(&self) -> &[String] {
        &self.clinics
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    fn take_failure(&mut self) -> Result<(), SubmissionError> {
        match self.pending_failure.take() {
            Some(message) => {
                debug!(%message, "simulated submission failure");
                Err(SubmissionError::new(message))
            }
            None => Ok(()),
        }
    }
}

impl Submitter<CustomerDraft> for InMemoryDirectory {
    type Entity = Customer;

    fn submit(&mut self, draft: &CustomerDraft) -> Result<Customer, SubmissionError> {
        self.take_failure()?;
        let taken = self.customers.iter().any(|customer| {
            customer.email.eq_ignore_ascii_case(&draft.email) && Some(customer.id) != draft.id
        });
        if taken {
            return Err(SubmissionError::new("A customer with this email already exists"));
        }

        if let Some(id) = draft.id {
            let customer = self
                .customers
                .iter_mut()
                .find(|customer| customer.id == id)
                .ok_or_else(|| SubmissionError::new("Customer not found"))?;
            customer.full_name = draft.full_name.clone();
            customer.email = draft.email.clone();
            customer.phone = draft.phone.clone();
            customer.date_of_birth = draft.date_of_birth;
            customer.address = draft.address.clone();
            customer.preferred_contact = draft.preferred_contact;
            customer.notes = draft.notes.clone();
            info!(customer = %id, "customer updated");
            return Ok(customer.clone());
        }

        let customer = Customer {
            id: Uuid::new_v4(),
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            date_of_birth: draft.date_of_birth,
            address: draft.address.clone(),
            preferred_contact: draft.preferred_contact,
            notes: draft.notes.clone(),
            status: AccountStatus::Approved,
            is_active: true,
            created_at: Utc::now(),
        };
        info!(customer = %customer.id, "customer created");
        self.customers.push(customer.clone());
        Ok(customer)
    }
}

impl Submitter<DoctorDraft> for InMemoryDirectory {
    type Entity = Doctor;

    fn submit(&mut self, draft: &DoctorDraft) -> Result<Doctor, SubmissionError> {
        self.take_failure()?;
        if self
            .doctors
            .iter()
            .any(|doctor| doctor.email.eq_ignore_ascii_case(&draft.email))
        {
            return Err(SubmissionError::new("A doctor with this email already exists"));
        }
        if self
            .doctors
            .iter()
            .any(|doctor| doctor.license_number == draft.license_number)
        {
            return Err(SubmissionError::new("License number is already registered"));
        }
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            specialty: draft.specialty.clone(),
            license_number: draft.license_number.clone(),
            status: AccountStatus::Pending,
            is_active: false,
            created_at: Utc::now(),
        };
        info!(doctor = %doctor.id, "doctor created, awaiting approval");
        self.doctors.push(doctor.clone());
        Ok(doctor)
    }
}

impl Submitter<OrderDraft> for InMemoryDirectory {
    type Entity = ClinicOrder;

    fn submit(&mut self, draft: &OrderDraft) -> Result<ClinicOrder, SubmissionError> {
        self.take_failure()?;
        let product = self
            .catalog
            .iter_mut()
            .find(|product| product.sku == draft.sku)
            .ok_or_else(|| SubmissionError::new(format!("Unknown product {}", draft.sku)))?;
        if draft.quantity > product.stock {
            return Err(SubmissionError::new(format!(
                "Only {} units of {} in stock",
                product.stock, product.name
            )));
        }
        let total_cents = product
            .unit_price_cents
            .checked_mul(u64::from(draft.quantity))
            .ok_or_else(|| SubmissionError::new("Order total is too large"))?;
        product.stock -= draft.quantity;
        let order = ClinicOrder {
            id: Uuid::new_v4(),
            clinic: draft.clinic.clone(),
            sku: product.sku.clone(),
            product_name: product.name.clone(),
            quantity: draft.quantity,
            total_cents,
            delivery_date: draft.delivery_date,
            status: OrderStatus::Pending,
            notes: draft.notes.clone(),
            created_at: Utc::now(),
        };
        info!(order = %order.id, total_cents = order.total_cents, "clinic order placed");
        self.orders.push(order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::display::import::import_products;
    use crate::portal::Address;

    fn customer_draft(email: &str) -> CustomerDraft {
        CustomerDraft {
            id: None,
            full_name: "Ada Lovelace".into(),
            email: email.into(),
            phone: "(312) 555-1234".into(),
            date_of_birth: None,
            address: Address {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip: "62701".into(),
            },
            preferred_contact: None,
            notes: None,
        }
    }

    #[test]
    fn customer_email_must_be_unique() {
        let mut directory = InMemoryDirectory::new();
        let created = directory.submit(&customer_draft("ada@example.com")).unwrap();
        assert!(created.is_active);
        let err = directory
            .submit(&customer_draft("ADA@example.com"))
            .unwrap_err();
        assert_eq!(err.message, "A customer with this email already exists");
        assert_eq!(directory.customers().len(), 1);
    }

    #[test]
    fn editing_keeps_id_and_own_email() {
        let mut directory = InMemoryDirectory::new();
        let created = directory.submit(&customer_draft("ada@example.com")).unwrap();
        let mut edit = customer_draft("ada@example.com");
        edit.id = Some(created.id);
        edit.full_name = "Ada King".into();
        let updated = directory.submit(&edit).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(directory.customers()[0].full_name, "Ada King");
    }

    #[test]
    fn fail_next_only_fails_once() {
        let mut directory = InMemoryDirectory::new();
        directory.fail_next("Service unavailable");
        let err = directory.submit(&customer_draft("a@example.com")).unwrap_err();
        assert_eq!(err.message, "Service unavailable");
        assert!(directory.submit(&customer_draft("a@example.com")).is_ok());
    }

    #[test]
    fn orders_consume_stock() {
        let mut directory = InMemoryDirectory::demo();
        let draft = OrderDraft {
            clinic: "Lakeview Clinic".into(),
            sku: "SY-300".into(),
            quantity: 10,
            delivery_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            notes: None,
        };
        let order = directory.submit(&draft).unwrap();
        assert_eq!(order.total_cents, 24_500);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(directory.catalog()[2].stock, 25);

        let too_many = OrderDraft {
            quantity: 30,
            ..draft
        };
        let err = directory.submit(&too_many).unwrap_err();
        assert_eq!(err.message, "Only 25 units of Syringe Pack in stock");
    }

    #[test]
    fn oversized_totals_are_rejected_without_touching_stock() {
        let mut directory = InMemoryDirectory::new();
        let report = import_products("BIG-1,Bulk,184467440737095516.15,10");
        assert_eq!(directory.load_products(&report), 1);
        let draft = OrderDraft {
            clinic: "Lakeview Clinic".into(),
            sku: "BIG-1".into(),
            quantity: 2,
            delivery_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            notes: None,
        };
        let err = directory.submit(&draft).unwrap_err();
        assert_eq!(err.message, "Order total is too large");
        assert_eq!(directory.catalog()[0].stock, 10);
        assert!(directory.orders().is_empty());
    }
}
