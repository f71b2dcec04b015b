use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// AI gateway request format (OpenAI compatible chat completion)
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            modalities: None,
            response_format: None,
            stream: None,
        }
    }

    /// Ask for an image back alongside any text.
    pub fn with_image_output(mut self) -> Self {
        self.modalities = Some(vec!["image".to_string(), "text".to_string()]);
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.response_format = Some(ResponseFormat {
            kind: "json_object".to_string(),
        });
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }
}

/// One conversation turn. Client-supplied turns are forwarded as sent: content
/// of any shape and extra fields (`name`, `tool_calls`, ...) pass through.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "MessageContent::is_absent")]
    pub content: MessageContent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
            extra: Map::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
            extra: Map::new(),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    // client content is kept verbatim, whatever its shape
    Raw(Value),
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Raw(Value::Null)
    }
}

impl MessageContent {
    fn is_absent(&self) -> bool {
        matches!(self, MessageContent::Raw(Value::Null))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

// AI gateway response format
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AssistantMessage {
    // some models send structured content; only plain strings are used
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GeneratedImage {
    #[serde(default)]
    pub image_url: Option<ImageUrl>,
}

impl ChatCompletionResponse {
    fn first_message(&self) -> Option<&AssistantMessage> {
        self.choices.first().and_then(|c| c.message.as_ref())
    }

    /// Text of the first choice, if it is a non-empty string.
    pub fn text(&self) -> Option<&str> {
        self.first_message()
            .and_then(|m| m.content.as_ref())
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// URL (usually a data URL) of the first generated image.
    pub fn image_url(&self) -> Option<&str> {
        self.first_message()
            .and_then(|m| m.images.first())
            .and_then(|img| img.image_url.as_ref())
            .map(|u| u.url.as_str())
            .filter(|s| !s.is_empty())
    }
}

// Handler request bodies. Fields that need a type check of their own stay as
// raw JSON values so "missing" and "wrong type" give different messages.

#[derive(Deserialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    #[serde(default)]
    pub image_base64: Option<Value>,
    #[serde(default)]
    pub prompt: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EnhancePromptRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageToPromptRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub text_input: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RemixImagesRequest {
    #[serde(default)]
    pub images: Option<Value>,
    #[serde(default)]
    pub prompt: Option<String>,
}

// Handler response bodies

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnhancePromptResponse {
    pub enhanced_prompt: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PromptsResponse {
    pub prompts: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_like_openai() {
        let req = ChatCompletionRequest::new(
            "google/gemini-2.5-flash-image-preview",
            vec![ChatMessage::user_parts(vec![
                ContentPart::text("add a hat"),
                ContentPart::image("data:image/png;base64,AAAA"),
            ])],
        )
        .with_image_output();

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "google/gemini-2.5-flash-image-preview",
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "add a hat" },
                        { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }
                    ]
                }],
                "modalities": ["image", "text"]
            })
        );
    }

    #[test]
    fn json_output_and_stream_flags() {
        let req = ChatCompletionRequest::new("m", vec![ChatMessage::system("s")])
            .with_json_output()
            .with_stream(false);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["response_format"], json!({ "type": "json_object" }));
        assert_eq!(value["stream"], json!(false));
        assert_eq!(value["messages"][0], json!({ "role": "system", "content": "s" }));
    }

    #[test]
    fn response_extracts_text_and_image() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "here you go",
                    "images": [{ "type": "image_url", "image_url": { "url": "data:image/png;base64,QQ==" } }]
                }
            }]
        }))
        .unwrap();

        assert_eq!(resp.text(), Some("here you go"));
        assert_eq!(resp.image_url(), Some("data:image/png;base64,QQ=="));
    }

    #[test]
    fn response_missing_fields_yield_none() {
        let empty: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), None);
        assert_eq!(empty.image_url(), None);

        let blank: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "", "images": [{}] } }]
        }))
        .unwrap();
        assert_eq!(blank.text(), None);
        assert_eq!(blank.image_url(), None);

        let structured: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": [{ "type": "text", "text": "x" }] } }]
        }))
        .unwrap();
        assert_eq!(structured.text(), None);
    }

    #[test]
    fn client_messages_deserialize() {
        let messages: Vec<ChatMessage> = serde_json::from_value(json!([
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "hello" }
        ]))
        .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(
            serde_json::to_value(&messages[0]).unwrap(),
            serde_json::to_value(ChatMessage::user("hi")).unwrap()
        );
    }

    #[test]
    fn client_messages_pass_through_unchanged() {
        let sent = json!([
            { "role": "user", "content": [{ "type": "input_audio", "input_audio": { "data": "AAAA" } }] },
            { "role": "user", "content": [{ "type": "text", "text": "hi", "cache_control": { "type": "ephemeral" } }] },
            { "role": "assistant", "content": null, "tool_calls": [{ "id": "t1" }] },
            { "role": "tool", "tool_call_id": "t1", "name": "lookup" }
        ]);
        let messages: Vec<ChatMessage> = serde_json::from_value(sent.clone()).unwrap();
        let mut expected = sent;
        // null content is dropped rather than echoed
        expected[2].as_object_mut().unwrap().remove("content");
        assert_eq!(serde_json::to_value(&messages).unwrap(), expected);
    }

    #[test]
    fn client_messages_need_string_role() {
        assert!(serde_json::from_value::<ChatMessage>(json!({ "content": "hi" })).is_err());
        assert!(serde_json::from_value::<ChatMessage>(json!({ "role": 1, "content": "hi" })).is_err());
        assert!(serde_json::from_value::<ChatMessage>(json!("hi")).is_err());
    }

    #[test]
    fn response_bodies_use_camel_case() {
        let body = serde_json::to_value(ImageResponse {
            image_url: "u".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "imageUrl": "u" }));

        let body = serde_json::to_value(EnhancePromptResponse {
            enhanced_prompt: "p".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "enhancedPrompt": "p" }));
    }
}
