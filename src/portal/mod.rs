//! Entity wizards hosted by the dashboard portals.

pub mod customer;
pub mod doctor;
pub mod order;

pub use customer::{Address, ContactChannel, Customer, CustomerDraft, CustomerForm};
pub use doctor::{Doctor, DoctorDraft, DoctorForm, SPECIALTIES};
pub use order::{format_cents, ClinicOrder, ClinicOrderForm, OrderDraft, Product};
