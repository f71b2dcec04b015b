use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;
use tracing::debug;

use super::{admit, complete, missing_output, parse_body, require_credentials};
use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::models::{ChatCompletionRequest, ChatMessage, ContentPart, ImageResponse, RemixImagesRequest};
use crate::prompts::{DEFAULT_REMIX_PROMPT, IMAGE_MODEL, multi_remix_prompt, single_remix_prompt};
use crate::state::SharedState;
use crate::validation::MAX_REMIX_IMAGES;

pub async fn remix_images_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImageResponse>> {
    admit(&state, Endpoint::RemixImages, &headers)?;

    let payload: RemixImagesRequest = parse_body(&body)?;
    let items = match payload.images {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(GatewayError::validation("At least one image is required")),
    };
    if items.len() > MAX_REMIX_IMAGES {
        return Err(GatewayError::validation("Maximum 4 images can be remixed at once"));
    }
    let images = items
        .into_iter()
        .map(|item| match item {
            Value::String(url) if !url.is_empty() => Ok(url),
            _ => Err(GatewayError::validation("Invalid image format")),
        })
        .collect::<Result<Vec<String>>>()?;

    require_credentials(&state)?;

    let base_prompt = payload
        .prompt
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_REMIX_PROMPT);

    let (text, unable) = if images.len() == 1 {
        (single_remix_prompt(base_prompt), "Unable to remix image")
    } else {
        (multi_remix_prompt(base_prompt, images.len()), "Unable to remix images")
    };
    debug!(images = images.len(), "remixing images");

    let mut parts = Vec::with_capacity(images.len() + 1);
    parts.push(ContentPart::text(text));
    parts.extend(images.into_iter().map(ContentPart::image));

    let request = ChatCompletionRequest::new(IMAGE_MODEL, vec![ChatMessage::user_parts(parts)])
        .with_image_output();

    let response = complete(
        &state,
        Endpoint::RemixImages,
        &request,
        unable,
        "Failed to remix images",
    )
    .await?;

    let image_url = response
        .image_url()
        .ok_or_else(|| missing_output(Endpoint::RemixImages, unable, "image"))?;

    Ok(Json(ImageResponse {
        image_url: image_url.to_string(),
    }))
}
