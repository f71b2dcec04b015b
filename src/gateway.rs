//! Client for the external chat-completion API.

use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error};

use crate::error::GatewayError;
use crate::metrics::UPSTREAM_LATENCY;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse};

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("no API key configured for the AI gateway")]
    MissingCredentials,

    #[error("request to AI gateway failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI gateway returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl UpstreamError {
    /// Map to what the caller sees. `unable` is used when the gateway answered
    /// with an error status, `failed` when the call itself broke.
    pub fn into_gateway_error(self, unable: &'static str, failed: &'static str) -> GatewayError {
        match self {
            UpstreamError::MissingCredentials => GatewayError::Unavailable,
            UpstreamError::Status { status: 429, .. } => GatewayError::UpstreamBusy,
            UpstreamError::Status { status: 402, .. } => GatewayError::QuotaExceeded,
            err @ UpstreamError::Status { .. } => GatewayError::Upstream {
                message: unable,
                detail: err.to_string(),
            },
            err @ UpstreamError::Transport(_) => GatewayError::Internal {
                message: failed,
                detail: err.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            // blank keys count as missing
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Build with its own HTTP client using `timeout` for every call.
    pub fn with_timeout(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, base_url, api_key))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials)?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, messages = request.messages.len(), "calling AI gateway");

        let start_time = Instant::now();
        let result = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await;
        UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "AI gateway error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ChatCompletionResponse>().await?)
    }
}
