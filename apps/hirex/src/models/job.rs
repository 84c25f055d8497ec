use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job description the user created, kept in the local recent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: Uuid,
    pub content: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Backend identifier returned by `POST /jobs`.
    pub job_id: i64,
}

/// Which collection a fetch targets. Passed explicitly by the caller; the core
/// never reads persisted state to decide this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchContext {
    pub job_id: Option<i64>,
}

impl FetchContext {
    pub fn all_candidates() -> Self {
        Self { job_id: None }
    }

    pub fn ranked_for(job_id: i64) -> Self {
        Self {
            job_id: Some(job_id),
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.job_id.is_some()
    }
}
