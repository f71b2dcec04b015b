use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;

use super::{admit, complete, missing_output, parse_body, require_credentials};
use crate::endpoint::Endpoint;
use crate::error::{GatewayError, Result};
use crate::models::{ChatCompletionRequest, ChatMessage, ChatRequest, ChatResponse};
use crate::prompts::{CHAT_MODEL, CHAT_SYSTEM_PROMPT};
use crate::state::SharedState;

pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>> {
    admit(&state, Endpoint::Chat, &headers)?;

    let payload: ChatRequest = parse_body(&body)?;
    let Some(Value::Array(items)) = payload.messages else {
        return Err(GatewayError::validation("Messages array is required"));
    };

    let mut messages = Vec::with_capacity(items.len() + 1);
    messages.push(ChatMessage::system(CHAT_SYSTEM_PROMPT));
    for item in items {
        let message: ChatMessage = serde_json::from_value(item)
            .map_err(|_| GatewayError::validation("Invalid message format"))?;
        messages.push(message);
    }

    require_credentials(&state)?;

    let model = payload
        .model
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| CHAT_MODEL.to_string());
    let request = ChatCompletionRequest::new(model, messages).with_stream(false);

    let response = complete(
        &state,
        Endpoint::Chat,
        &request,
        "Unable to process request",
        "Failed to process chat request",
    )
    .await?;

    let message = response
        .text()
        .ok_or_else(|| missing_output(Endpoint::Chat, "Unable to generate response", "message content"))?;

    Ok(Json(ChatResponse {
        message: message.to_string(),
    }))
}
