//! HTTP request handlers

pub mod auth;
pub mod certificates;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod settings;

pub use auth::{current_session, login, logout};
pub use certificates::{
    certificate_document, create_certificate, delete_certificate, get_certificate,
    list_certificates, renew_certificate, update_certificate,
};
pub use clients::{
    create_client, delete_client, get_client, list_client_certificates, list_clients,
    update_client,
};
pub use dashboard::{dashboard_stats, monthly_issuance, upcoming_renewals};
pub use health::health_check;
pub use reports::{export_clients, export_expiry_report};
pub use settings::{get_settings, update_settings};
