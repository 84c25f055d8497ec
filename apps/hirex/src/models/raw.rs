//! Wire shapes as returned by the extraction and ranking backend.
//!
//! Nothing here is trusted: every field is optional and loosely typed so that a
//! single malformed record can never fail a whole response. The ingestion adapter
//! (`candidates::ingest`) is the only consumer of these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::candidate::RankingContext;

/// A skills field as the backend stores it: either a JSON-encoded array inside a
/// string, or a native array. Anything else is kept so deserialization never fails.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SkillField {
    Encoded(String),
    Native(Vec<Value>),
    Other(Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidateRecord {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub skills: Option<SkillField>,
    pub soft_skills: Option<SkillField>,
    pub experience_summary: Option<Value>,
    pub certifications: Option<Value>,
    pub projects: Option<Value>,
    pub title: Option<Value>,
    pub company: Option<Value>,
    pub location: Option<Value>,
}

impl RawCandidateRecord {
    /// Reads a record out of an arbitrary JSON value. A value that is not an
    /// object yields an empty record rather than an error.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Candidate record is not an object, using empty record: {e}");
            Self::default()
        })
    }
}

/// One element of `GET /jobs/{id}/candidates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankedRecord {
    pub candidate: Option<Value>,
    pub match_score: Option<Value>,
    pub reasoning: Option<Value>,
}

impl RankedRecord {
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ranked record is not an object, using empty record: {e}");
            Self::default()
        })
    }

    /// Splits the ranked entry into the candidate payload and its ranking context.
    /// A missing or non-numeric score becomes 0.0, which suppresses the score sentence.
    pub fn into_parts(self) -> (RawCandidateRecord, RankingContext) {
        let record = self
            .candidate
            .map(RawCandidateRecord::from_value)
            .unwrap_or_default();
        let match_score = self
            .match_score
            .as_ref()
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let reasoning = match self.reasoning {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        (
            record,
            RankingContext {
                match_score,
                reasoning,
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Per-file result of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub filename: String,
    pub status: UploadStatus,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub candidate_id: Option<i64>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }

    /// `"<filename>: <detail>"` for failed files, `None` for successes.
    pub fn failure_message(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        let detail = self
            .detail
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Upload failed");
        Some(format!("{}: {}", self.filename, detail))
    }
}

/// Response of `POST /jobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedJob {
    pub job_id: i64,
}
