//! Certificate models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Prefix of every human-readable serial number
pub const SERIAL_PREFIX: &str = "CERT-";

/// First value of the serial counter
pub const FIRST_SERIAL: u64 = 1001;

/// Format a serial counter value, e.g. `CERT-1001`
pub fn format_serial(counter: u64) -> String {
    format!("{}{}", SERIAL_PREFIX, counter)
}

/// Parse the counter out of a serial number
pub fn parse_serial(serial: &str) -> Option<u64> {
    serial.strip_prefix(SERIAL_PREFIX)?.parse().ok()
}

/// An issued gas installation safety certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certificate {
    pub id: Uuid,
    pub serial_number: String,
    pub client_id: Uuid,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub technical_notes: Option<String>,
    /// Cached classification; always recomputed from `expiry_date`
    pub status: CertificateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived status of a certificate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Current,
    /// Within the largest alert threshold of its expiry date
    NearExpiry,
    Expired,
}

impl CertificateStatus {
    pub const ALL: [CertificateStatus; 3] = [
        CertificateStatus::Current,
        CertificateStatus::NearExpiry,
        CertificateStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::Current => "current",
            CertificateStatus::NearExpiry => "near_expiry",
            CertificateStatus::Expired => "expired",
        }
    }

    pub fn display_name_es(&self) -> &'static str {
        match self {
            CertificateStatus::Current => "Vigente",
            CertificateStatus::NearExpiry => "Próximo a vencer",
            CertificateStatus::Expired => "Vencido",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown certificate status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CertificateStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(CertificateStatus::Current),
            "near_expiry" => Ok(CertificateStatus::NearExpiry),
            "expired" => Ok(CertificateStatus::Expired),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Input for issuing or replacing a certificate
///
/// When `expiry_date` is absent it is computed from `issue_date` and the
/// configured validity period.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "crate::validation::validate_certificate_dates", skip_on_field_errors = false))]
pub struct CertificateInput {
    #[validate(custom = "crate::validation::validate_client_ref")]
    pub client_id: Uuid,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub technical_notes: Option<String>,
}

/// Filter for listing certificates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateFilter {
    pub status: Option<CertificateStatus>,
    pub search: Option<String>,
}
