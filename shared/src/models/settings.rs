//! Application settings singleton

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default alert thresholds in days before expiry
pub const DEFAULT_ALERT_DAYS: [u32; 3] = [30, 60, 90];

/// Default certificate validity in years
pub const DEFAULT_VALIDITY_YEARS: u32 = 5;

/// Default idle session timeout in seconds
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 1800;

/// Default login name
pub const DEFAULT_USERNAME: &str = "gestion";

/// Persisted application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub company: CompanyInfo,
    pub auth: AuthSettings,
    pub certificates: CertificatePolicy,
}

/// Company details printed on every certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CompanyInfo {
    #[validate(custom = "crate::validation::validate_required")]
    pub name: String,
    pub address: String,
    pub phone: String,
    #[validate(custom = "crate::validation::validate_email")]
    pub email: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Revisiones Gas Pro".to_string(),
            address: "Calle Principal 123".to_string(),
            phone: "900 123 456".to_string(),
            email: "info@revisionesgas.com".to_string(),
            logo_url: None,
        }
    }
}

/// The single credential pair and the idle timeout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    pub username: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    pub session_timeout_secs: u64,
}

/// Validity and alerting rules for certificates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificatePolicy {
    pub validity_years: u32,
    pub alert_days: Vec<u32>,
}

impl Default for CertificatePolicy {
    fn default() -> Self {
        Self {
            validity_years: DEFAULT_VALIDITY_YEARS,
            alert_days: DEFAULT_ALERT_DAYS.to_vec(),
        }
    }
}

impl CertificatePolicy {
    /// Largest alert threshold; the near-expiry window
    pub fn max_alert_days(&self) -> i64 {
        crate::dates::max_alert_days(&self.alert_days)
    }
}

impl Settings {
    /// Default settings with the given password hash
    pub fn with_password_hash(password_hash: String) -> Self {
        Self {
            company: CompanyInfo::default(),
            auth: AuthSettings {
                username: DEFAULT_USERNAME.to_string(),
                password_hash,
                session_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            },
            certificates: CertificatePolicy::default(),
        }
    }
}

/// Input for the settings page
///
/// `new_password` is only applied when present; the stored hash is never
/// sent back to clients.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SettingsInput {
    #[validate]
    pub company: CompanyInfo,
    #[validate(custom = "crate::validation::validate_required")]
    pub username: String,
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_password")]
    pub new_password: Option<String>,
    #[validate(range(min = 60, max = 86400, message = "El tiempo de sesión debe estar entre 60 y 86400 segundos"))]
    pub session_timeout_secs: u64,
    #[validate(range(min = 1, max = 50, message = "La validez debe estar entre 1 y 50 años"))]
    pub validity_years: u32,
    #[validate(custom = "crate::validation::validate_alert_days")]
    pub alert_days: Vec<u32>,
}

/// Settings as exposed over the API, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsView {
    pub company: CompanyInfo,
    pub username: String,
    pub session_timeout_secs: u64,
    pub validity_years: u32,
    pub alert_days: Vec<u32>,
}

impl From<&Settings> for SettingsView {
    fn from(settings: &Settings) -> Self {
        Self {
            company: settings.company.clone(),
            username: settings.auth.username.clone(),
            session_timeout_secs: settings.auth.session_timeout_secs,
            validity_years: settings.certificates.validity_years,
            alert_days: settings.certificates.alert_days.clone(),
        }
    }
}
