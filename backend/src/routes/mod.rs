//! Route definitions for the Gas Certificate Manager

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// The session gate needs the state to look up the live session, so it is
/// handed in here rather than taken from the router.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Login (public)
        .route("/auth/login", post(handlers::login))
        // Everything else sits behind the session gate
        .merge(protected_routes(state))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", session_routes())
        .nest("/clients", client_routes())
        .nest("/certificates", certificate_routes())
        .nest("/dashboard", dashboard_routes())
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .nest("/reports", report_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Session routes (protected)
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(handlers::logout))
        .route("/session", get(handlers::current_session))
}

/// Client management routes (protected)
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clients).post(handlers::create_client))
        .route(
            "/:client_id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route(
            "/:client_id/certificates",
            get(handlers::list_client_certificates),
        )
}

/// Certificate management routes (protected)
fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_certificates).post(handlers::create_certificate),
        )
        .route(
            "/:certificate_id",
            get(handlers::get_certificate)
                .put(handlers::update_certificate)
                .delete(handlers::delete_certificate),
        )
        .route("/:certificate_id/renew", post(handlers::renew_certificate))
        .route(
            "/:certificate_id/document",
            get(handlers::certificate_document),
        )
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard_stats))
        .route("/monthly", get(handlers::monthly_issuance))
        .route("/upcoming", get(handlers::upcoming_renewals))
}

/// Report download routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/clients.csv", get(handlers::export_clients))
        .route("/expiry.csv", get(handlers::export_expiry_report))
}
