#![doc(test(attr(deny(warnings))))]

//! Portal Core provides the multi-step form wizards, modal shell and
//! presentation rules behind the healthcare-commerce dashboard portals.

pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod errors;
pub mod forms;
pub mod modal;
pub mod portal;
pub mod session;
pub mod ui;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Portal Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
