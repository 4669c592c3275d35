//! CSV exports of the client list and the expiry report

use std::collections::HashMap;

use serde::Serialize;
use shared::{days_remaining, format_date, Certificate, Client};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Name used when a certificate points at a client that no longer exists
pub const UNKNOWN_CLIENT: &str = "Cliente desconocido";

#[derive(Debug, Serialize)]
struct ClientRow<'a> {
    #[serde(rename = "Nombre")]
    name: &'a str,
    #[serde(rename = "DNI")]
    dni: &'a str,
    #[serde(rename = "Teléfono")]
    phone: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Dirección")]
    address: &'a str,
    #[serde(rename = "Tipo de instalación")]
    installation_type: &'a str,
    #[serde(rename = "Tipo de gas")]
    gas_type: &'a str,
    #[serde(rename = "Alta")]
    created: String,
}

#[derive(Debug, Serialize)]
struct ExpiryRow<'a> {
    #[serde(rename = "Número de serie")]
    serial_number: &'a str,
    #[serde(rename = "Cliente")]
    client: &'a str,
    #[serde(rename = "Teléfono")]
    phone: &'a str,
    #[serde(rename = "Emisión")]
    issue_date: String,
    #[serde(rename = "Vencimiento")]
    expiry_date: String,
    #[serde(rename = "Días restantes")]
    days_remaining: i64,
    #[serde(rename = "Estado")]
    status: &'static str,
}

/// Serialize rows to CSV with a header line taken from the field names
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}

/// One row per client, sorted by name
pub fn client_list_csv(clients: &[Client]) -> AppResult<String> {
    let mut sorted: Vec<&Client> = clients.iter().collect();
    sorted.sort_by_key(|c| c.name.to_lowercase());

    let rows: Vec<ClientRow> = sorted
        .into_iter()
        .map(|c| ClientRow {
            name: &c.name,
            dni: c.dni.as_deref().unwrap_or(""),
            phone: &c.phone,
            email: &c.email,
            address: &c.address,
            installation_type: c.installation_type.map_or("", |t| t.display_name_es()),
            gas_type: c.gas_type.map_or("", |g| g.display_name_es()),
            created: format_date(c.created_at.date_naive()),
        })
        .collect();

    export_to_csv(&rows)
}

/// One row per certificate, soonest expiry first
pub fn expiry_report_csv(
    certificates: &[Certificate],
    clients: &[Client],
    today: chrono::NaiveDate,
) -> AppResult<String> {
    let by_id: HashMap<Uuid, &Client> = clients.iter().map(|c| (c.id, c)).collect();

    let mut sorted: Vec<&Certificate> = certificates.iter().collect();
    sorted.sort_by_key(|c| c.expiry_date);

    let rows: Vec<ExpiryRow> = sorted
        .into_iter()
        .map(|cert| {
            let client = by_id.get(&cert.client_id);
            ExpiryRow {
                serial_number: &cert.serial_number,
                client: client.map_or(UNKNOWN_CLIENT, |c| c.name.as_str()),
                phone: client.map_or("", |c| c.phone.as_str()),
                issue_date: format_date(cert.issue_date),
                expiry_date: format_date(cert.expiry_date),
                days_remaining: days_remaining(cert.expiry_date, today),
                status: cert.status.display_name_es(),
            }
        })
        .collect();

    export_to_csv(&rows)
}
