//! HTTP handlers for certificate endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use shared::{Certificate, CertificateFilter, CertificateInput};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::document::render_certificate_document;
use crate::services::CertificateListing;
use crate::AppState;

// ============================================================================
// Certificate CRUD
// ============================================================================

/// List certificates, newest first, filtered by status and search term
pub async fn list_certificates(
    State(state): State<AppState>,
    Query(filter): Query<CertificateFilter>,
) -> Json<Vec<CertificateListing>> {
    let registry = state.registry.read().await;
    Json(registry.list_certificates(&filter))
}

/// Issue a new certificate
pub async fn create_certificate(
    State(state): State<AppState>,
    Json(input): Json<CertificateInput>,
) -> AppResult<(StatusCode, Json<Certificate>)> {
    let certificate = state.registry.write().await.add_certificate(input)?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// Get a certificate by ID
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Json<Certificate>> {
    state
        .registry
        .read()
        .await
        .get_certificate(certificate_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("certificate".to_string()))
}

/// Replace a certificate's details
pub async fn update_certificate(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
    Json(input): Json<CertificateInput>,
) -> AppResult<Json<Certificate>> {
    state
        .registry
        .write()
        .await
        .update_certificate(certificate_id, input)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("certificate".to_string()))
}

/// Delete a certificate
pub async fn delete_certificate(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state
        .registry
        .write()
        .await
        .delete_certificate(certificate_id)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("certificate".to_string()))
    }
}

// ============================================================================
// Renewal and documents
// ============================================================================

/// Issue a follow-up certificate for the same client, valid from today
pub async fn renew_certificate(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<Certificate>)> {
    state
        .registry
        .write()
        .await
        .renew_certificate(certificate_id)?
        .map(|renewed| (StatusCode::CREATED, Json(renewed)))
        .ok_or_else(|| AppError::NotFound("certificate".to_string()))
}

/// Printable HTML document for a certificate
pub async fn certificate_document(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let registry = state.registry.read().await;
    let certificate = registry
        .get_certificate(certificate_id)
        .ok_or_else(|| AppError::NotFound("certificate".to_string()))?;
    let client = registry
        .get_client(certificate.client_id)
        .ok_or_else(|| AppError::NotFound("client".to_string()))?;

    Ok(Html(render_certificate_document(
        registry.settings(),
        client,
        certificate,
    )))
}
