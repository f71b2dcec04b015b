use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use super::{admit, complete, missing_output, parse_body, require_credentials};
use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::models::{ChatCompletionRequest, ChatMessage, EnhancePromptRequest, EnhancePromptResponse};
use crate::prompts::{ENHANCE_MODEL, EnhanceKind, FARSI_NOTE};
use crate::state::SharedState;
use crate::validation::require_prompt;

pub async fn enhance_prompt_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<EnhancePromptResponse>> {
    admit(&state, Endpoint::EnhancePrompt, &headers)?;

    let payload: EnhancePromptRequest = parse_body(&body)?;
    let prompt = require_prompt(payload.prompt.as_ref(), "Prompt exceeds maximum length")?;

    // absent or empty type means "generate"
    let kind = match payload.kind.as_deref().filter(|k| !k.is_empty()) {
        None => EnhanceKind::Generate,
        Some(kind) => EnhanceKind::parse(kind)
            .ok_or_else(|| GatewayError::validation("Invalid type parameter"))?,
    };

    require_credentials(&state)?;

    let mut system_prompt = kind.system_prompt().to_string();
    if payload.language.as_deref() == Some("fa") {
        system_prompt.push_str(FARSI_NOTE);
    }

    let request = ChatCompletionRequest::new(
        ENHANCE_MODEL,
        vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
    );

    let response = complete(
        &state,
        Endpoint::EnhancePrompt,
        &request,
        "Unable to enhance prompt",
        "Failed to enhance prompt",
    )
    .await?;

    let enhanced = response.text().ok_or_else(|| {
        missing_output(Endpoint::EnhancePrompt, "Unable to enhance prompt", "enhanced prompt")
    })?;

    Ok(Json(EnhancePromptResponse {
        enhanced_prompt: enhanced.to_string(),
    }))
}
