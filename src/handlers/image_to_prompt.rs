use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;

use super::{admit, complete, missing_output, parse_body, require_credentials};
use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::models::{
    ChatCompletionRequest, ChatMessage, ContentPart, ImageToPromptRequest, PromptsResponse,
};
use crate::prompts::{IMAGE_ANALYSIS_PROMPT, VISION_MODEL, model_prompts_request, text_enhance_prompt};
use crate::state::SharedState;
use crate::validation::{check_base64_image, check_length};

const FAILED: &str = "Failed to generate prompts";
const UNABLE: &str = "Unable to generate prompts";

/// Turns an image or a rough idea into a description, then into a set of
/// prompts tuned for several image models.
pub async fn image_to_prompt_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PromptsResponse>> {
    admit(&state, Endpoint::ImageToPrompt, &headers)?;

    let payload: ImageToPromptRequest = parse_body(&body)?;
    let image = payload.image_base64.as_deref().filter(|s| !s.is_empty());
    let text = payload.text_input.as_deref().filter(|s| !s.is_empty());

    // an image wins over text when both are sent
    match (image, text) {
        (Some(image), _) => check_base64_image(image)?,
        (None, Some(text)) => {
            check_length(text, "Text input exceeds maximum length of 5000 characters")?
        }
        (None, None) => return Err(GatewayError::validation("Image or text input is required")),
    }

    require_credentials(&state)?;

    let description = match image {
        Some(image) => describe_image(&state, image).await?,
        None => {
            let idea = text.unwrap_or_default();
            expand_idea(&state, idea, payload.style.as_deref(), payload.mood.as_deref()).await?
        }
    };

    let request = ChatCompletionRequest::new(
        VISION_MODEL,
        vec![ChatMessage::user(model_prompts_request(
            &description,
            payload.negative_prompt.as_deref(),
        ))],
    )
    .with_json_output();

    let response = complete(&state, Endpoint::ImageToPrompt, &request, UNABLE, FAILED).await?;
    let content = response
        .text()
        .ok_or_else(|| missing_output(Endpoint::ImageToPrompt, UNABLE, "prompt JSON"))?;

    let prompts: Value =
        serde_json::from_str(strip_code_fence(content)).map_err(|e| GatewayError::Upstream {
            message: UNABLE,
            detail: format!("model returned invalid prompt JSON: {e}"),
        })?;
    if !prompts.is_object() {
        return Err(missing_output(Endpoint::ImageToPrompt, UNABLE, "prompt object"));
    }

    Ok(Json(PromptsResponse { prompts }))
}

async fn describe_image(state: &SharedState, image: &str) -> Result<String> {
    let request = ChatCompletionRequest::new(
        VISION_MODEL,
        vec![ChatMessage::user_parts(vec![
            ContentPart::text(IMAGE_ANALYSIS_PROMPT),
            ContentPart::image(format!("data:image/jpeg;base64,{image}")),
        ])],
    );

    let unable = "Unable to analyze image";
    let response = complete(state, Endpoint::ImageToPrompt, &request, unable, FAILED).await?;
    response
        .text()
        .map(str::to_string)
        .ok_or_else(|| missing_output(Endpoint::ImageToPrompt, unable, "image description"))
}

async fn expand_idea(
    state: &SharedState,
    idea: &str,
    style: Option<&str>,
    mood: Option<&str>,
) -> Result<String> {
    let request = ChatCompletionRequest::new(
        VISION_MODEL,
        vec![ChatMessage::user(text_enhance_prompt(idea, style, mood))],
    );

    let unable = "Unable to enhance text";
    let response = complete(state, Endpoint::ImageToPrompt, &request, unable, FAILED).await?;
    response
        .text()
        .map(str::to_string)
        .ok_or_else(|| missing_output(Endpoint::ImageToPrompt, unable, "enhanced text"))
}

// Models asked for JSON sometimes still wrap it in a ```json fence
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
