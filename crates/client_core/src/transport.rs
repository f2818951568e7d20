//! HTTP access to the generator's two endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::GenerationRequest,
    protocol::{GenerateForm, GenerateResponse, StepsForm, StepsResponse, GENERATE_PATH, STEPS_PATH},
};
use tracing::{debug, warn};

use crate::{
    error::{GenerateError, StepFetchError},
    types::{Artifact, StepFrame},
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait QrApi: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Artifact, GenerateError>;
    async fn fetch_steps(&self, form: &StepsForm) -> Result<Vec<StepFrame>, StepFetchError>;
}

pub struct HttpQrApi {
    http: Client,
    server_url: String,
}

impl HttpQrApi {
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self::with_client(http, server_url))
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

#[async_trait]
impl QrApi for HttpQrApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<Artifact, GenerateError> {
        let form = GenerateForm::from(request);
        let res = self
            .http
            .post(self.endpoint(GENERATE_PATH))
            .form(&form)
            .send()
            .await
            .map_err(GenerateError::network)?;
        let status = res.status();
        // Failure bodies arrive with 4xx/5xx statuses; the body decides.
        let body: GenerateResponse = res.json().await.map_err(GenerateError::network)?;
        debug!(%status, success = body.success, "generate response");
        generate_outcome(body)
    }

    async fn fetch_steps(&self, form: &StepsForm) -> Result<Vec<StepFrame>, StepFetchError> {
        let res = self
            .http
            .post(self.endpoint(STEPS_PATH))
            .form(form)
            .send()
            .await
            .map_err(|err| StepFetchError::Transport(err.to_string()))?;
        let body: StepsResponse = res
            .json()
            .await
            .map_err(|err| StepFetchError::Transport(err.to_string()))?;
        steps_outcome(body)
    }
}

pub(crate) fn generate_outcome(body: GenerateResponse) -> Result<Artifact, GenerateError> {
    if !body.success {
        return Err(GenerateError::application(body.error));
    }
    match (body.image_base64, body.image_url) {
        (Some(data), Some(url)) => Ok(Artifact {
            url,
            data,
            version: body.version,
        }),
        _ => {
            warn!("generate response flagged success without image fields");
            Err(GenerateError::application(body.error))
        }
    }
}

pub(crate) fn steps_outcome(body: StepsResponse) -> Result<Vec<StepFrame>, StepFetchError> {
    if !body.success {
        return Err(StepFetchError::Application(body.error));
    }
    Ok(body
        .steps
        .unwrap_or_default()
        .into_iter()
        .map(|step| StepFrame {
            image: step.image,
            description: step.description,
        })
        .collect())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
