use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::debug;

use super::{admit, complete, missing_output, parse_body, preview, require_credentials};
use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::models::{ChatCompletionRequest, ChatMessage, GenerateImageRequest, ImageResponse};
use crate::prompts::{IMAGE_MODEL, VALID_STYLES, style_suffix};
use crate::state::SharedState;
use crate::validation::require_prompt;

pub async fn generate_image_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImageResponse>> {
    admit(&state, Endpoint::GenerateImage, &headers)?;

    let payload: GenerateImageRequest = parse_body(&body)?;
    let prompt = require_prompt(
        payload.prompt.as_ref(),
        "Prompt exceeds maximum length of 5000 characters",
    )?;

    let style = payload.style.as_deref().filter(|s| !s.is_empty());
    if let Some(style) = style
        && !VALID_STYLES.contains(&style)
    {
        return Err(GatewayError::validation("Invalid style parameter"));
    }

    require_credentials(&state)?;

    let full_prompt = match style.and_then(style_suffix) {
        Some(suffix) => format!("{prompt}, {suffix}"),
        None => prompt.to_string(),
    };
    debug!(prompt = %preview(&full_prompt, 100), ?style, "generating image");

    let request = ChatCompletionRequest::new(IMAGE_MODEL, vec![ChatMessage::user(full_prompt)])
        .with_image_output();

    let response = complete(
        &state,
        Endpoint::GenerateImage,
        &request,
        "Unable to generate image",
        "Failed to generate image",
    )
    .await?;

    let image_url = response.image_url().ok_or_else(|| {
        missing_output(
            Endpoint::GenerateImage,
            "Unable to generate image. The AI service may be temporarily unavailable or out of credits.",
            "image",
        )
    })?;

    Ok(Json(ImageResponse {
        image_url: image_url.to_string(),
    }))
}
