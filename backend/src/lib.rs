//! Gas Certificate Manager - Backend
//!
//! Administration service for a gas-installation inspection business:
//! clients, the safety certificates issued to them, expiry tracking, and
//! printable certificate documents, behind a single-user session.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::{Mutex, RwLock};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod storage;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{CertificateRegistry, RegistryOptions, SessionGuard};
pub use storage::{JsonFileStorage, MemoryStorage, StateKey, Storage};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<CertificateRegistry>>,
    pub session: Arc<Mutex<SessionGuard>>,
    pub clock: SharedClock,
}

/// Load the registry and any persisted session from `storage`
pub fn build_state(
    config: &Config,
    storage: Arc<dyn Storage>,
    clock: SharedClock,
) -> AppResult<AppState> {
    let registry = CertificateRegistry::load(
        Arc::clone(&storage),
        Arc::clone(&clock),
        RegistryOptions::from(config),
    )?;
    let session = SessionGuard::restore(storage, Arc::clone(&clock))?;

    Ok(AppState {
        registry: Arc::new(RwLock::new(registry)),
        session: Arc::new(Mutex::new(session)),
        clock,
    })
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Gas Certificate Manager API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
