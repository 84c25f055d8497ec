use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::backend::{CandidateBackend, HttpBackend};
use crate::config::Config;
use crate::coordinator::CollectionCoordinator;
use crate::jobs::JobStore;

/// Everything a command needs: configuration, the backend, the candidate
/// collection and the persisted job state.
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn CandidateBackend>,
    pub coordinator: CollectionCoordinator,
    pub jobs: JobStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = HttpBackend::new(config.api_url.clone(), config.timeout)
            .context("Failed to build HTTP client")?;
        info!("Backend: {} (timeout {:?})", config.api_url, config.timeout);
        Ok(Self::with_backend(config, Arc::new(http)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn CandidateBackend>) -> Self {
        let jobs = JobStore::load(config.state_path.clone());
        Self {
            coordinator: CollectionCoordinator::new(Arc::clone(&backend)),
            backend,
            jobs,
            config,
        }
    }
}
