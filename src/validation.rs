//! Input checks shared by several handlers. Messages are shown to end users.

use serde_json::Value;

use crate::error::GatewayError;

pub const MAX_PROMPT_CHARS: usize = 5000;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_REMIX_IMAGES: usize = 4;

/// JSON "truthiness": missing, null, false, 0 and "" all count as absent.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Required prompt field: present, a string and within the length cap.
pub fn require_prompt<'a>(value: Option<&'a Value>, too_long: &str) -> Result<&'a str, GatewayError> {
    if is_blank(value) {
        return Err(GatewayError::validation("Prompt is required"));
    }
    let prompt = value
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::validation("Invalid prompt format"))?;
    check_length(prompt, too_long)?;
    Ok(prompt)
}

pub fn check_length(text: &str, too_long: &str) -> Result<(), GatewayError> {
    if text.chars().count() > MAX_PROMPT_CHARS {
        return Err(GatewayError::validation(too_long));
    }
    Ok(())
}

/// Size and alphabet checks for a raw (not data-URL) base64 image.
pub fn check_base64_image(data: &str) -> Result<(), GatewayError> {
    let estimated_size = data.len() * 3 / 4;
    if estimated_size > MAX_IMAGE_BYTES {
        return Err(GatewayError::validation("Image size exceeds 10MB limit"));
    }
    if data.is_empty() || !data.bytes().all(is_base64_byte) {
        return Err(GatewayError::validation("Invalid image format"));
    }
    Ok(())
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}
