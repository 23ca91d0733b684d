//! HTTP client for the validation backend's submission endpoints.

use crate::config::Config;
use crate::error::SubmissionError;
use crate::models::{
    EvaluateRequest, EvaluationResult, RawInputData, SourceData, SubmissionHistoryResult,
    SubmissionResult,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

pub const HISTORICAL_DATA_PATH: &str = "api/submissions/historical-data";
pub const EVALUATE_PATH: &str = "api/submissions/evaluate";
pub const SUBMIT_DATA_PATH: &str = "api/submissions/submit-data";

/// Client for the submission endpoints. Each call issues one POST and waits for it.
pub struct SubmissionClient {
    client: reqwest::Client,
    config: Config,
}

impl SubmissionClient {
    /// Create a client whose requests are bounded by the configured timeout
    pub fn new(config: Config) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the submitter's previous chats and last submission time.
    pub async fn fetch_historical_data(
        &self,
        source_data: &SourceData,
    ) -> Result<SubmissionHistoryResult, SubmissionError> {
        let history: SubmissionHistoryResult = self
            .post_json(HISTORICAL_DATA_PATH, &source_data.to_submission_json())
            .await
            .inspect_err(|e| error!(error = %e, "fetching submission history failed"))?;

        info!(
            is_valid = history.is_valid,
            groups = history.chat_histories.len(),
            has_last_submission = history.last_submission.is_some(),
            "fetched submission history"
        );
        Ok(history)
    }

    /// Send raw chats for quality and uniqueness scoring.
    ///
    /// Transport, status and decode failures come back as a result with
    /// `is_valid = false` and zeroed scores so the caller can carry on.
    pub async fn evaluate_submission(
        &self,
        source_data: &SourceData,
        raw_input: &RawInputData,
    ) -> EvaluationResult {
        match self.try_evaluate_submission(source_data, raw_input).await {
            Ok(result) => result,
            Err(SubmissionError::HttpStatus { status, body }) => {
                error!(status, body = %body, "evaluate submission failed");
                EvaluationResult::failure(format!("Evaluate request failed with status {}", status))
            }
            Err(e) => {
                error!(error = %e, "evaluate submission failed");
                EvaluationResult::failure(e.to_string())
            }
        }
    }

    /// Same as [`evaluate_submission`](Self::evaluate_submission) but keeps the typed error
    pub async fn try_evaluate_submission(
        &self,
        source_data: &SourceData,
        raw_input: &RawInputData,
    ) -> Result<EvaluationResult, SubmissionError> {
        let request = EvaluateRequest::new(source_data, raw_input);
        info!(chats = request.chats.len(), "calling evaluate endpoint");

        let result: EvaluationResult = self.post_json(EVALUATE_PATH, &request).await?;
        info!(
            quality = result.quality,
            uniqueness = result.uniqueness,
            score = result.score,
            "evaluate response received"
        );
        Ok(result)
    }

    /// Submit the finalized proof data.
    pub async fn submit_data(
        &self,
        source_data: &SourceData,
    ) -> Result<SubmissionResult, SubmissionError> {
        let result: SubmissionResult = self
            .post_json(SUBMIT_DATA_PATH, &source_data.to_submission_json())
            .await
            .inspect_err(|e| error!(error = %e, "submit data failed"))?;

        info!(is_valid = result.is_valid, "submit data complete");
        Ok(result)
    }

    /// POST `body` as JSON and decode a 200 response into `T`
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SubmissionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint_url(path);
        debug!(url = %url, "posting to validation backend");

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_else(|e| e.to_string());
            return Err(SubmissionError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
