use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{JobId, JobSnapshot, ResearchError};

/// Fallback when a rejected submission carries no detail message.
pub const SUBMIT_ERROR_FALLBACK: &str = "Research initialization failed";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The backend job API consumed by the poll loop.
#[async_trait]
pub trait ResearchApi: Send + Sync {
    /// Creates a research job for the query and returns its id.
    async fn submit(&self, query: &str) -> Result<JobId, ResearchError>;

    /// Fetches the current status snapshot for a job.
    async fn status(&self, job_id: &str) -> Result<JobSnapshot, ResearchError>;
}

#[derive(Debug, Clone)]
pub struct HttpResearchApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: JobId,
}

#[derive(Debug, Deserialize)]
struct SubmitErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

impl HttpResearchApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ResearchError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/api/research{}",
            self.settings.base_url.trim_end_matches('/'),
            suffix
        )
    }
}

#[async_trait]
impl ResearchApi for HttpResearchApi {
    async fn submit(&self, query: &str) -> Result<JobId, ResearchError> {
        let response = self
            .client
            .post(self.endpoint(""))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            // The backend reports rejections as `{"detail": ...}`; an empty
            // or missing detail falls back to the generic message.
            let detail = response
                .json::<SubmitErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .filter(|detail| !detail.is_empty())
                .unwrap_or_else(|| SUBMIT_ERROR_FALLBACK.to_string());
            return Err(ResearchError::Submission(detail));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|err| ResearchError::InvalidResponse(err.to_string()))?;
        Ok(body.job_id)
    }

    async fn status(&self, job_id: &str) -> Result<JobSnapshot, ResearchError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/{job_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::StatusCheck(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|err| ResearchError::InvalidResponse(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ResearchError {
    if err.is_timeout() {
        return ResearchError::Network(format!("request timed out: {err}"));
    }
    ResearchError::Network(err.to_string())
}
