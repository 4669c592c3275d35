//! CSV report downloads

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::AppResult;
use crate::services::reporting::{client_list_csv, expiry_report_csv};
use crate::AppState;

fn csv_attachment(file_name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

/// Export all clients
pub async fn export_clients(State(state): State<AppState>) -> AppResult<Response> {
    let csv = client_list_csv(state.registry.read().await.clients())?;
    Ok(csv_attachment("clientes.csv", csv))
}

/// Export all certificates with their expiry dates
pub async fn export_expiry_report(State(state): State<AppState>) -> AppResult<Response> {
    let today = state.clock.today();
    let registry = state.registry.read().await;
    let csv = expiry_report_csv(registry.certificates(), registry.clients(), today)?;
    Ok(csv_attachment("vencimientos.csv", csv))
}
