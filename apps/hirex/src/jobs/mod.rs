//! Job descriptions: title extraction, creation against the backend, and the
//! persisted active/recent job state.

pub mod store;

pub use store::JobStore;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::backend::CandidateBackend;
use crate::errors::AppError;
use crate::models::job::SavedJob;

pub const UNTITLED_JOB: &str = "Untitled JD";
const TITLE_MAX_CHARS: usize = 50;

/// First non-blank line of the description, cut to 50 characters.
pub fn extract_title(content: &str) -> String {
    let Some(line) = content.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return UNTITLED_JOB.to_string();
    };
    if line.chars().count() > TITLE_MAX_CHARS {
        let head: String = line.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

/// Creates the job on the backend, then records it as the active job.
pub async fn create_job(
    backend: &dyn CandidateBackend,
    store: &mut JobStore,
    title: Option<&str>,
    description: &str,
) -> Result<SavedJob, AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }

    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .unwrap_or_else(|| extract_title(description));

    let created = backend.create_job(&title, description).await?;
    info!("Created job {} ({title})", created.job_id);

    let job = SavedJob {
        id: Uuid::new_v4(),
        content: description.to_string(),
        title,
        created_at: Utc::now(),
        job_id: created.job_id,
    };
    store.remember(job.clone())?;
    Ok(job)
}
