//! Background jobs
//!
//! Each job is a tokio interval loop that takes the same locks as request
//! handlers, so a job run never interleaves with a mutation.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

use crate::config::JobsConfig;
use crate::error::AppResult;
use crate::AppState;

/// Reclassify every certificate against today's date; returns how many changed
pub async fn refresh_statuses(state: &AppState) -> AppResult<usize> {
    state.registry.write().await.refresh_statuses()
}

/// Expire the session if it has been idle past its deadline; true when it
/// was expired by this call
pub async fn expire_idle_session(state: &AppState) -> bool {
    let mut session = state.session.lock().await;
    let was_authenticated = session.is_authenticated();
    was_authenticated && !session.check()
}

/// Job scheduler for background tasks
pub struct JobScheduler {
    state: AppState,
    config: JobsConfig,
}

impl JobScheduler {
    pub fn new(state: AppState, config: JobsConfig) -> Self {
        Self { state, config }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!(
            status_refresh_secs = self.config.status_refresh_secs,
            session_check_secs = self.config.session_check_secs,
            "Starting background job scheduler"
        );

        vec![
            tokio::spawn(Self::status_refresh_job(Arc::clone(&self))),
            tokio::spawn(Self::session_check_job(Arc::clone(&self))),
        ]
    }

    /// Keep certificate statuses in line with the calendar (daily by default)
    async fn status_refresh_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(scheduler.config.status_refresh_secs.max(1)));

        loop {
            interval.tick().await;
            debug!("Running certificate status refresh");

            match refresh_statuses(&scheduler.state).await {
                Ok(0) => debug!("Status refresh: no changes"),
                Ok(count) => info!("Status refresh updated {} certificates", count),
                Err(e) => error!("Failed to refresh certificate statuses: {}", e),
            }
        }
    }

    /// Drop idle sessions (every minute by default)
    async fn session_check_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(scheduler.config.session_check_secs.max(1)));

        loop {
            interval.tick().await;

            if expire_idle_session(&scheduler.state).await {
                info!("Idle session expired by session check");
            }
        }
    }
}
