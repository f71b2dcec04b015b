mod chat;
mod edit_image;
mod enhance_prompt;
mod generate_image;
mod health;
mod image_to_prompt;
mod metrics;
mod remix_images;

pub use chat::chat_handler;
pub use edit_image::edit_image_handler;
pub use enhance_prompt::enhance_prompt_handler;
pub use generate_image::generate_image_handler;
pub use health::health_handler;
pub use image_to_prompt::image_to_prompt_handler;
pub use metrics::metrics_handler;
pub use remix_images::remix_images_handler;

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL, UPSTREAM_ERRORS_TOTAL};
use crate::models::{ChatCompletionRequest, ChatCompletionResponse};
use crate::state::AppState;

pub const CLIENT_HEADER: &str = "x-forwarded-for";
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Client identity used for rate limiting: the raw forwarded-for value.
///
/// Requests without it all share the `unknown` bucket.
pub fn client_id(headers: &HeaderMap) -> &str {
    headers
        .get(CLIENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
}

// Rate limit check, always the first thing a protected handler does
fn admit(state: &AppState, endpoint: Endpoint, headers: &HeaderMap) -> Result<()> {
    REQUEST_TOTAL.with_label_values(&[endpoint.name()]).inc();

    let client = client_id(headers);
    let result = state
        .rate_limiter
        .check(&endpoint.client_key(client), state.policy(endpoint));

    if !result.allowed {
        RATE_LIMITED_TOTAL.with_label_values(&[endpoint.name()]).inc();
        warn!(%endpoint, client, retry_after = ?result.retry_after, "too many requests");
        return Err(GatewayError::RateLimited {
            retry_after: result.retry_after,
        });
    }
    Ok(())
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "malformed request body");
        GatewayError::validation("Invalid request body")
    })
}

fn require_credentials(state: &AppState) -> Result<()> {
    if state.gateway.is_configured() {
        Ok(())
    } else {
        Err(GatewayError::Unavailable)
    }
}

/// Call the AI gateway, mapping failures to `unable` (error status) or
/// `failed` (transport or decoding).
async fn complete(
    state: &AppState,
    endpoint: Endpoint,
    request: &ChatCompletionRequest,
    unable: &'static str,
    failed: &'static str,
) -> Result<ChatCompletionResponse> {
    state.gateway.chat_completion(request).await.map_err(|e| {
        UPSTREAM_ERRORS_TOTAL.with_label_values(&[endpoint.name()]).inc();
        e.into_gateway_error(unable, failed)
    })
}

/// A 2xx reply that lacks the field we need.
fn missing_output(endpoint: Endpoint, message: &'static str, what: &str) -> GatewayError {
    UPSTREAM_ERRORS_TOTAL.with_label_values(&[endpoint.name()]).inc();
    GatewayError::Upstream {
        message,
        detail: format!("{endpoint}: AI gateway response had no {what}"),
    }
}

// First `max` characters, for logging user input
fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
