//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Kind of gas installation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InstallationType {
    /// Single dwelling installation
    Individual,
    /// Shared installation serving a whole building
    Communal,
}

impl InstallationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallationType::Individual => "individual",
            InstallationType::Communal => "communal",
        }
    }

    pub fn display_name_es(&self) -> &'static str {
        match self {
            InstallationType::Individual => "Individual",
            InstallationType::Communal => "Comunitaria",
        }
    }
}

/// Gas supplied to the installation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GasType {
    Natural,
    Butane,
    Propane,
}

impl GasType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GasType::Natural => "natural",
            GasType::Butane => "butane",
            GasType::Propane => "propane",
        }
    }

    pub fn display_name_es(&self) -> &'static str {
        match self {
            GasType::Natural => "Gas natural",
            GasType::Butane => "Butano",
            GasType::Propane => "Propano",
        }
    }
}

/// A single invalid form field with a user-facing message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// One month of certificate issuance for dashboard charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub count: usize,
}
