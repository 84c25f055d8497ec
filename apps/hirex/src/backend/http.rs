use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{BackendError, CandidateBackend, UploadFile};
use crate::models::raw::{CreatedJob, RankedRecord, RawCandidateRecord, UploadOutcome};

const UPLOAD_ENDPOINT: &str = "/upload";
const JOBS_ENDPOINT: &str = "/jobs";
const CANDIDATES_ENDPOINT: &str = "/candidates";

/// reqwest client for the HireX backend. No retries: a failed request is
/// reported once and the user re-triggers the action.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Backend response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Backend returned {}: {}", status, body);
        Err(BackendError::Api {
            status: status.as_u16(),
            message: error_detail(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let body = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pulls the `detail` message out of an error body. Validation errors carry a
/// list of `{msg}` objects; anything unrecognised falls back to the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body).map(|b| b.detail) {
        Ok(Value::String(detail)) => detail,
        Ok(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                body.trim().to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl CandidateBackend for HttpBackend {
    async fn list_candidates(&self) -> Result<Vec<RawCandidateRecord>, BackendError> {
        let records: Vec<Value> = self
            .send_json(self.client.get(self.url(CANDIDATES_ENDPOINT)))
            .await?;
        info!("Fetched {} candidates", records.len());
        Ok(records.into_iter().map(RawCandidateRecord::from_value).collect())
    }

    async fn ranked_candidates(&self, job_id: i64) -> Result<Vec<RankedRecord>, BackendError> {
        let url = self.url(&format!("{JOBS_ENDPOINT}/{job_id}{CANDIDATES_ENDPOINT}"));
        let records: Vec<Value> = self.send_json(self.client.get(url)).await?;
        info!("Fetched {} ranked candidates for job {}", records.len(), job_id);
        Ok(records.into_iter().map(RankedRecord::from_value).collect())
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<UploadOutcome>, BackendError> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let mime = file.mime_type();
            let part = Part::stream(file.content)
                .file_name(file.filename)
                .mime_str(mime)?;
            form = form.part("files", part);
        }

        info!("Uploading {} file(s)", count);
        let outcomes: Vec<UploadOutcome> = self
            .send_json(self.client.post(self.url(UPLOAD_ENDPOINT)).multipart(form))
            .await?;
        Ok(outcomes)
    }

    async fn create_job(&self, title: &str, description: &str) -> Result<CreatedJob, BackendError> {
        let form = Form::new()
            .text("title", title.to_string())
            .text("description", description.to_string());
        let created: CreatedJob = self
            .send_json(self.client.post(self.url(JOBS_ENDPOINT)).multipart(form))
            .await?;
        info!("Created job {}", created.job_id);
        Ok(created)
    }

    async fn delete_candidate(&self, id: i64) -> Result<(), BackendError> {
        let url = self.url(&format!("{CANDIDATES_ENDPOINT}/{id}"));
        self.send(self.client.delete(url)).await?;
        info!("Deleted candidate {}", id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), BackendError> {
        self.send(self.client.delete(self.url(CANDIDATES_ENDPOINT)))
            .await?;
        info!("Deleted all candidates");
        Ok(())
    }
}
