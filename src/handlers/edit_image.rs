use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;
use tracing::{debug, info};

use super::{admit, complete, missing_output, parse_body, preview, require_credentials};
use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::models::{ChatCompletionRequest, ChatMessage, ContentPart, EditImageRequest, ImageResponse};
use crate::prompts::IMAGE_MODEL;
use crate::state::SharedState;
use crate::validation::{check_base64_image, check_length, is_blank};

pub async fn edit_image_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImageResponse>> {
    admit(&state, Endpoint::EditImage, &headers)?;

    let payload: EditImageRequest = parse_body(&body)?;
    if is_blank(payload.image_base64.as_ref()) || is_blank(payload.prompt.as_ref()) {
        return Err(GatewayError::validation("Image and prompt are required"));
    }
    let (Some(Value::String(image)), Some(Value::String(prompt))) =
        (payload.image_base64, payload.prompt)
    else {
        return Err(GatewayError::validation("Invalid input format"));
    };

    check_length(&prompt, "Prompt exceeds maximum length of 5000 characters")?;
    check_base64_image(&image)?;

    require_credentials(&state)?;

    debug!(prompt = %preview(&prompt, 100), image_len = image.len(), "sending edit request");

    let request = ChatCompletionRequest::new(
        IMAGE_MODEL,
        vec![ChatMessage::user_parts(vec![
            ContentPart::text(prompt),
            ContentPart::image(format!("data:image/png;base64,{image}")),
        ])],
    )
    .with_image_output();

    let response = complete(
        &state,
        Endpoint::EditImage,
        &request,
        "Unable to edit image",
        "Failed to edit image",
    )
    .await?;

    let image_url = response.image_url().ok_or_else(|| {
        missing_output(
            Endpoint::EditImage,
            "Unable to edit image - no image data in response",
            "image",
        )
    })?;

    info!("edited image");
    Ok(Json(ImageResponse {
        image_url: image_url.to_string(),
    }))
}
