//! Gas Certificate Manager - Backend Server

use std::{net::SocketAddr, sync::Arc};

use gascert::{
    build_state, create_app, jobs::JobScheduler, Config, JsonFileStorage, SharedClock,
    SystemClock,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gascert_server=debug,gascert=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Gas Certificate Manager");
    tracing::info!("Environment: {}", config.environment);

    // Open persisted state
    tracing::info!("Using data directory {}", config.storage.data_dir.display());
    let storage = Arc::new(JsonFileStorage::open(&config.storage.data_dir)?);
    let clock: SharedClock = Arc::new(SystemClock);

    let state = build_state(&config, storage, clock)?;

    // Background jobs
    Arc::new(JobScheduler::new(state.clone(), config.jobs.clone())).start();

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
