use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::job::{FetchContext, SavedJob};

pub const MAX_RECENT_JOBS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedJobs {
    #[serde(default)]
    active_job: Option<SavedJob>,
    #[serde(default)]
    recent_jobs: Vec<SavedJob>,
}

/// Client-side job state: the active job description and the most recent ones,
/// newest first. Stored as a single JSON file.
#[derive(Debug)]
pub struct JobStore {
    path: PathBuf,
    state: PersistedJobs,
}

impl JobStore {
    /// Loads the store from `path`. A missing or unreadable file yields an
    /// empty store; this never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Ignoring corrupt job state at {}: {e}", path.display());
                PersistedJobs::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No job state at {}", path.display());
                PersistedJobs::default()
            }
            Err(e) => {
                warn!("Could not read job state at {}: {e}", path.display());
                PersistedJobs::default()
            }
        };
        Self { path, state }
    }

    pub fn active(&self) -> Option<&SavedJob> {
        self.state.active_job.as_ref()
    }

    pub fn recent(&self) -> &[SavedJob] {
        &self.state.recent_jobs
    }

    /// Ranked mode when a job is active, otherwise all candidates.
    pub fn fetch_context(&self) -> FetchContext {
        match self.active() {
            Some(job) => FetchContext::ranked_for(job.job_id),
            None => FetchContext::all_candidates(),
        }
    }

    /// Makes `job` the active job and prepends it to the recent list.
    pub fn remember(&mut self, job: SavedJob) -> Result<(), AppError> {
        self.state.recent_jobs.insert(0, job.clone());
        self.state.recent_jobs.truncate(MAX_RECENT_JOBS);
        self.state.active_job = Some(job);
        self.save()
    }

    pub fn clear_active(&mut self) -> Result<(), AppError> {
        self.state.active_job = None;
        self.save()
    }

    fn save(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Store(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let bytes = serde_json::to_vec_pretty(&self.state)
            .map_err(|e| AppError::Store(e.to_string()))?;
        fs::write(&self.path, bytes)
            .map_err(|e| AppError::Store(format!("cannot write {}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(job_id: i64) -> SavedJob {
        SavedJob {
            id: Uuid::new_v4(),
            content: format!("Job {job_id}\nWe need a Rust engineer."),
            title: format!("Job {job_id}"),
            created_at: Utc::now(),
            job_id,
        }
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::load(dir.path().join("state.json"));
        assert!(store.active().is_none());
        assert!(store.recent().is_empty());
        assert_eq!(store.fetch_context(), FetchContext::all_candidates());
    }

    #[test]
    fn test_corrupt_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let store = JobStore::load(&path);
        assert!(store.active().is_none());
    }

    #[test]
    fn test_remember_persists_active_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = JobStore::load(&path);
        let saved = job(42);
        store.remember(saved.clone()).unwrap();
        assert_eq!(store.fetch_context(), FetchContext::ranked_for(42));

        let reloaded = JobStore::load(&path);
        assert_eq!(reloaded.active(), Some(&saved));
        assert_eq!(reloaded.recent(), &[saved]);
    }

    #[test]
    fn test_recent_list_is_capped_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JobStore::load(dir.path().join("state.json"));
        for job_id in 1..=12 {
            store.remember(job(job_id)).unwrap();
        }
        let ids: Vec<i64> = store.recent().iter().map(|j| j.job_id).collect();
        assert_eq!(ids, (3..=12).rev().collect::<Vec<_>>());
        assert_eq!(store.active().map(|j| j.job_id), Some(12));
    }

    #[test]
    fn test_clear_active_keeps_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = JobStore::load(&path);
        store.remember(job(1)).unwrap();
        store.clear_active().unwrap();

        let reloaded = JobStore::load(&path);
        assert!(reloaded.active().is_none());
        assert_eq!(reloaded.recent().len(), 1);
        assert_eq!(reloaded.fetch_context(), FetchContext::all_candidates());
    }
}
