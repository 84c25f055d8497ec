use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

/// Application-level error type returned at the coordinator and CLI boundary.
///
/// Malformed backend fields never show up here; the ingestion adapter absorbs them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .0.user_message())]
    Backend(#[from] BackendError),

    #[error("All {} upload(s) failed", .failures.len())]
    UploadRejected { failures: Vec<String> },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-visible notification, recorded once by whoever reports the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_displays_user_message() {
        let err = AppError::from(BackendError::Api {
            status: 404,
            message: "Candidate not found".to_string(),
        });
        assert_eq!(err.to_string(), "Candidate not found");
    }

    #[test]
    fn test_upload_rejected_counts_failures() {
        let err = AppError::UploadRejected {
            failures: vec!["a.pdf: bad".to_string(), "b.pdf: bad".to_string()],
        };
        assert_eq!(err.to_string(), "All 2 upload(s) failed");
    }
}
