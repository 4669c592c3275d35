//! Client models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{GasType, InstallationType};

/// A client whose installation receives certificates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// National ID (DNI/NIF)
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub secondary_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub installation_type: Option<InstallationType>,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub installer_company: Option<String>,
    #[serde(default)]
    pub gas_type: Option<GasType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a client
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClientInput {
    #[validate(custom = "crate::validation::validate_required")]
    pub name: String,
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone: String,
    #[validate(custom = "crate::validation::validate_email")]
    pub email: String,
    #[validate(custom = "crate::validation::validate_required")]
    pub address: String,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_optional_phone")]
    pub secondary_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub installation_type: Option<InstallationType>,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub installer_company: Option<String>,
    #[serde(default)]
    pub gas_type: Option<GasType>,
}

impl ClientInput {
    /// Trim text fields and drop optional ones left blank
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            dni: non_blank(self.dni),
            secondary_phone: non_blank(self.secondary_phone),
            notes: non_blank(self.notes),
            installation_type: self.installation_type,
            contract_number: non_blank(self.contract_number),
            installer_company: non_blank(self.installer_company),
            gas_type: self.gas_type,
        }
    }
}

impl Client {
    /// Build a new client from validated input
    pub fn from_input(id: Uuid, input: ClientInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            dni: input.dni,
            secondary_phone: input.secondary_phone,
            notes: input.notes,
            installation_type: input.installation_type,
            contract_number: input.contract_number,
            installer_company: input.installer_company,
            gas_type: input.gas_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field, keeping id and creation time
    pub fn apply(&mut self, input: ClientInput, now: DateTime<Utc>) {
        let created_at = self.created_at;
        *self = Self::from_input(self.id, input, now);
        self.created_at = created_at;
    }

    /// Case-insensitive match on name, email and address; substring match on
    /// phone numbers and DNI
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self.address.to_lowercase().contains(&term)
            || self.phone.contains(&term)
            || self
                .dni
                .as_deref()
                .is_some_and(|dni| dni.to_lowercase().contains(&term))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
