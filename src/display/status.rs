//! Status badge derivation for directory listings.
//!
//! The label and the badge tone are derived independently from the raw
//! approval status and the active flag. The pairings below are the ones the
//! dashboard ships with, including the surprising ones: a pending account
//! that is flagged active is labelled "Inactive" yet keeps the pending
//! (warning) tone.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Active,
    Inactive,
    Pending,
    Rejected,
    Suspended,
}

impl DisplayStatus {
    pub fn label(self) -> &'static str {
        match self {
            DisplayStatus::Active => "Active",
            DisplayStatus::Inactive => "Inactive",
            DisplayStatus::Pending => "Pending",
            DisplayStatus::Rejected => "Rejected",
            DisplayStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
    Neutral,
    Info,
}

impl BadgeTone {
    /// Utility classes used by the web front end.
    pub fn classes(self) -> &'static str {
        match self {
            BadgeTone::Success => "bg-green-100 text-green-800",
            BadgeTone::Warning => "bg-yellow-100 text-yellow-800",
            BadgeTone::Danger => "bg-red-100 text-red-800",
            BadgeTone::Neutral => "bg-gray-100 text-gray-800",
            BadgeTone::Info => "bg-blue-100 text-blue-800",
        }
    }
}

pub fn display_status(status: AccountStatus, is_active: bool) -> DisplayStatus {
    match (status, is_active) {
        (AccountStatus::Pending, true) => DisplayStatus::Inactive,
        (AccountStatus::Pending, false) => DisplayStatus::Pending,
        (AccountStatus::Approved, true) => DisplayStatus::Active,
        (AccountStatus::Approved, false) => DisplayStatus::Inactive,
        (AccountStatus::Rejected, _) => DisplayStatus::Rejected,
        (AccountStatus::Suspended, _) => DisplayStatus::Suspended,
    }
}

pub fn status_classes(status: AccountStatus, is_active: bool) -> BadgeTone {
    match (status, is_active) {
        (AccountStatus::Pending, _) => BadgeTone::Warning,
        (AccountStatus::Approved, true) => BadgeTone::Success,
        (AccountStatus::Approved, false) => BadgeTone::Neutral,
        (AccountStatus::Rejected, _) | (AccountStatus::Suspended, _) => BadgeTone::Danger,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn tone(self) -> BadgeTone {
        match self {
            OrderStatus::Pending => BadgeTone::Warning,
            OrderStatus::Processing | OrderStatus::Shipped => BadgeTone::Info,
            OrderStatus::Delivered => BadgeTone::Success,
            OrderStatus::Cancelled => BadgeTone::Danger,
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AccountStatus::Pending),
            "approved" => Ok(AccountStatus::Approved),
            "rejected" => Ok(AccountStatus::Rejected),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(format!("unknown account status `{}`", other)),
        }
    }
}
