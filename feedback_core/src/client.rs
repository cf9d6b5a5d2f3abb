//! HTTP client that submits the feedback form the way the browser page does

use crate::models::{FormSubmission, ResponseMessage, FEEDBACK_PATH, SUCCESS_MESSAGE};
use reqwest::{redirect, Client, RequestBuilder, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Response body is not a feedback message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and message read back from the feedback endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReply {
    pub status: u16,
    pub message: String,
}

impl SubmissionReply {
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::OK.as_u16() && self.message == SUCCESS_MESSAGE
    }
}

/// Sends one request per submission. Redirects are returned as errors, never followed.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    http: Client,
    endpoint: Url,
}

impl FeedbackClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(FEEDBACK_PATH))
            .map_err(|err| ClientError::InvalidUrl(format!("{}: {}", base_url, err)))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                base_url,
                endpoint.scheme()
            )));
        }

        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts the fields as `multipart/form-data`, like a browser `FormData` body.
    pub async fn submit(
        &self,
        submission: &FormSubmission,
    ) -> Result<SubmissionReply, ClientError> {
        let form = submission
            .to_pairs()
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (field, value)| {
                form.text(field, value.to_string())
            });

        self.send(self.http.post(self.endpoint.clone()).multipart(form)).await
    }

    pub async fn submit_json(
        &self,
        submission: &FormSubmission,
    ) -> Result<SubmissionReply, ClientError> {
        self.send(self.http.post(self.endpoint.clone()).json(submission)).await
    }

    pub async fn submit_urlencoded(
        &self,
        submission: &FormSubmission,
    ) -> Result<SubmissionReply, ClientError> {
        self.send(self.http.post(self.endpoint.clone()).form(&submission.to_pairs())).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<SubmissionReply, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), endpoint = %self.endpoint, "feedback response received");

        if status != StatusCode::OK && status != StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body: ResponseMessage = serde_json::from_slice(&bytes)?;

        Ok(SubmissionReply {
            status: status.as_u16(),
            message: body.message,
        })
    }
}
