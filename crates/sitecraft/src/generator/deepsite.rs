//! DeepSite generation client.
//!
//! The service exposes a Gradio-style prediction endpoint: the prompt is sent
//! as the only element of `data`, and the generated HTML comes back as the
//! first element of `data`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::error::GenerationError;
use super::provider::SiteGenerator;
use crate::config::GeneratorConfig;

/// HTTP client for a DeepSite prediction endpoint.
pub struct DeepSiteClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl DeepSiteClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                after: self.timeout,
            }
        } else {
            GenerationError::Request(err)
        }
    }
}

#[async_trait]
impl SiteGenerator for DeepSiteClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = PredictRequest { data: [prompt] };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GenerationError::Rejected {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        debug!(bytes = text.len(), "Received generation response");
        extract_html(&text)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(serde::Serialize)]
struct PredictRequest<'a> {
    data: [&'a str; 1],
}

#[derive(serde::Deserialize)]
struct PredictResponse {
    data: Option<Vec<serde_json::Value>>,
}

/// Pull the HTML document out of a prediction response body.
fn extract_html(body: &str) -> Result<String, GenerationError> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid json: {e}")))?;

    let first = response
        .data
        .and_then(|data| data.into_iter().next())
        .ok_or_else(|| GenerationError::MalformedResponse("missing data[0]".to_string()))?;

    match first {
        serde_json::Value::String(html) if !html.trim().is_empty() => Ok(html),
        serde_json::Value::String(_) => Err(GenerationError::MalformedResponse(
            "empty document".to_string(),
        )),
        other => Err(GenerationError::MalformedResponse(format!(
            "data[0] is not a string: {other}"
        ))),
    }
}
