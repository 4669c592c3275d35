//! Sample data written on first start so the dashboard is not empty

use chrono::{DateTime, Utc};
use shared::{
    expiry_date, format_serial, Certificate, CertificateStatus, Client, ClientInput, GasType,
    InstallationType,
};
use uuid::Uuid;

pub fn sample_client(now: DateTime<Utc>) -> Client {
    Client::from_input(
        Uuid::new_v4(),
        ClientInput {
            name: "Cliente Ejemplo".to_string(),
            phone: "600123456".to_string(),
            email: "cliente@ejemplo.com".to_string(),
            address: "Calle Ejemplo 1, 28001 Madrid".to_string(),
            dni: Some("12345678A".to_string()),
            installation_type: Some(InstallationType::Individual),
            gas_type: Some(GasType::Natural),
            ..Default::default()
        },
        now,
    )
}

/// A certificate issued today; status is recomputed by the registry on load
pub fn sample_certificate(
    client: &Client,
    serial: u64,
    validity_years: u32,
    now: DateTime<Utc>,
) -> Certificate {
    let issue_date = now.date_naive();
    Certificate {
        id: Uuid::new_v4(),
        serial_number: format_serial(serial),
        client_id: client.id,
        issue_date,
        expiry_date: expiry_date(issue_date, validity_years),
        technical_notes: Some("Instalación en buen estado general.".to_string()),
        status: CertificateStatus::Current,
        created_at: now,
        updated_at: now,
    }
}
