use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Everything a handler can answer with besides success. Clients only ever
/// see the `error` string; upstream details stay in the logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("rate limit exceeded, retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("upstream credentials are not configured")]
    Unavailable,

    #[error("upstream is rate limiting us")]
    UpstreamBusy,

    #[error("upstream quota exhausted")]
    QuotaExceeded,

    #[error("upstream failure: {detail}")]
    Upstream { message: &'static str, detail: String },

    #[error("unexpected failure: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::RateLimited { .. } | GatewayError::UpstreamBusy => {
                StatusCode::TOO_MANY_REQUESTS
            }
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unavailable | GatewayError::QuotaExceeded => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::Upstream { .. } | GatewayError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message the client is allowed to see.
    pub fn public_message(&self) -> &str {
        match self {
            GatewayError::RateLimited { .. } => RATE_LIMITED_MESSAGE,
            GatewayError::Validation(msg) => msg.as_str(),
            GatewayError::Unavailable => "Service temporarily unavailable",
            GatewayError::UpstreamBusy => "Service is busy. Please try again later.",
            GatewayError::QuotaExceeded => "Service quota exceeded. Please contact support.",
            GatewayError::Upstream { message, .. } | GatewayError::Internal { message, .. } => {
                *message
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            GatewayError::Upstream { detail, .. } => {
                tracing::error!(error = %detail, "AI gateway error");
            }
            GatewayError::Internal { detail, .. } => {
                tracing::error!(error = %detail, "internal error");
            }
            GatewayError::Unavailable => {
                tracing::error!("AI gateway API key not configured");
            }
            GatewayError::UpstreamBusy | GatewayError::QuotaExceeded => {
                tracing::warn!(error = %self, "AI gateway refused request");
            }
            GatewayError::RateLimited { .. } | GatewayError::Validation(_) => {}
        }

        let mut response =
            (self.status(), Json(json!({ "error": self.public_message() }))).into_response();

        if let GatewayError::RateLimited { retry_after } = self {
            let secs = retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rate_limited_sets_retry_after() {
        let response = GatewayError::RateLimited {
            retry_after: Some(17),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "17");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Too many requests. Please try again later." })
        );
    }

    #[tokio::test]
    async fn rate_limited_defaults_retry_after_to_sixty() {
        let response = GatewayError::RateLimited { retry_after: None }.into_response();
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
    }

    #[tokio::test]
    async fn upstream_detail_is_not_leaked() {
        let response = GatewayError::Upstream {
            message: "Unable to generate image",
            detail: "status 500: secret stack trace".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Unable to generate image" }));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            GatewayError::validation("Prompt is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GatewayError::Unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(GatewayError::QuotaExceeded.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(GatewayError::UpstreamBusy.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            GatewayError::Unavailable.public_message(),
            "Service temporarily unavailable"
        );
    }
}
