//! The extraction and ranking service as seen by the coordinator.
//!
//! The coordinator only ever talks to `dyn CandidateBackend`; `HttpBackend` is the
//! production implementation and tests substitute an in-memory one.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::models::raw::{CreatedJob, RankedRecord, RawCandidateRecord, UploadOutcome};

pub mod http;

pub use http::HttpBackend;

const GENERIC_FAILURE: &str = "Request failed. Please try again.";
const UNREACHABLE: &str = "Could not reach the server. Please try again.";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// The most specific message worth showing to a user: the server's own
    /// detail when it sent one, otherwise a generic text.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            BackendError::Api { status, .. } => format!("Request failed with status {status}."),
            BackendError::Http(e) if e.is_timeout() || e.is_connect() => UNREACHABLE.to_string(),
            BackendError::Http(_) | BackendError::Parse(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

/// A file queued for `POST /upload`.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        let lower = self.filename.to_lowercase();
        if lower.ends_with(".pdf") {
            "application/pdf"
        } else if lower.ends_with(".docx") {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        } else if lower.ends_with(".txt") {
            "text/plain"
        } else {
            "application/octet-stream"
        }
    }
}

#[async_trait]
pub trait CandidateBackend: Send + Sync {
    /// `GET /candidates`
    async fn list_candidates(&self) -> Result<Vec<RawCandidateRecord>, BackendError>;

    /// `GET /jobs/{id}/candidates`
    async fn ranked_candidates(&self, job_id: i64) -> Result<Vec<RankedRecord>, BackendError>;

    /// `POST /upload`, one multipart `files` part per file.
    async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<UploadOutcome>, BackendError>;

    /// `POST /jobs`
    async fn create_job(&self, title: &str, description: &str) -> Result<CreatedJob, BackendError>;

    /// `DELETE /candidates/{id}`
    async fn delete_candidate(&self, id: i64) -> Result<(), BackendError>;

    /// `DELETE /candidates`
    async fn delete_all(&self) -> Result<(), BackendError>;
}
