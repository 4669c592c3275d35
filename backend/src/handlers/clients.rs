//! HTTP handlers for client management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{Certificate, Client, ClientInput};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for listing clients
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteClientResponse {
    pub deleted: Uuid,
    pub certificates_removed: usize,
}

/// List clients, optionally filtered by a search term
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Json<Vec<Client>> {
    let registry = state.registry.read().await;
    Json(registry.list_clients(query.search.as_deref()))
}

/// Register a new client
pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<ClientInput>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = state.registry.write().await.add_client(input)?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Get a client by ID
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    state
        .registry
        .read()
        .await
        .get_client(client_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("client".to_string()))
}

/// Replace a client's details
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(input): Json<ClientInput>,
) -> AppResult<Json<Client>> {
    state
        .registry
        .write()
        .await
        .update_client(client_id, input)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("client".to_string()))
}

/// Delete a client together with its certificates
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<DeleteClientResponse>> {
    let removed = state
        .registry
        .write()
        .await
        .delete_client(client_id)?
        .ok_or_else(|| AppError::NotFound("client".to_string()))?;

    Ok(Json(DeleteClientResponse {
        deleted: client_id,
        certificates_removed: removed,
    }))
}

/// Certificate history of one client
pub async fn list_client_certificates(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Vec<Certificate>>> {
    let registry = state.registry.read().await;
    if registry.get_client(client_id).is_none() {
        return Err(AppError::NotFound("client".to_string()));
    }
    Ok(Json(registry.certificates_for_client(client_id)))
}
