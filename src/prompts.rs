//! Fixed instructions and model names sent to the AI gateway.

pub const CHAT_MODEL: &str = "google/gemini-2.5-flash";
pub const IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";
pub const ENHANCE_MODEL: &str = "google/gemini-2.5-pro";
pub const VISION_MODEL: &str = "google/gemini-2.5-flash";

pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant specializing in creative content, image generation, and digital art. You can help users with questions about their projects, provide creative suggestions, and assist with any questions they have about using this AI-powered platform.";

pub const VALID_STYLES: [&str; 9] = [
    "none",
    "photorealistic",
    "anime",
    "fantasy",
    "vintage",
    "cinematic",
    "abstract",
    "watercolor",
    "oil-painting",
];

/// Keywords appended to a generation prompt for a named style.
pub fn style_suffix(style: &str) -> Option<&'static str> {
    let suffix = match style {
        "photorealistic" => "photorealistic, ultra detailed, 8k resolution, professional photography",
        "anime" => "anime style, vibrant colors, detailed line art, studio quality",
        "fantasy" => "fantasy art, magical atmosphere, epic scene, concept art quality",
        "vintage" => "vintage style, retro aesthetic, film grain, classic composition",
        "cinematic" => "cinematic lighting, dramatic atmosphere, movie quality, epic scene",
        "abstract" => "abstract art, creative interpretation, artistic style, unique perspective",
        "watercolor" => "watercolor painting, soft colors, artistic brushstrokes, traditional art",
        "oil-painting" => "oil painting style, rich textures, classical art, museum quality",
        _ => return None,
    };
    Some(suffix)
}

/// What kind of prompt the enhancer is rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhanceKind {
    Generate,
    Edit,
    PromptToPrompt,
}

impl EnhanceKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "generate" => Some(EnhanceKind::Generate),
            "edit" => Some(EnhanceKind::Edit),
            "prompt-to-prompt" => Some(EnhanceKind::PromptToPrompt),
            _ => None,
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            EnhanceKind::Generate => ENHANCE_GENERATE_PROMPT,
            EnhanceKind::Edit => ENHANCE_EDIT_PROMPT,
            EnhanceKind::PromptToPrompt => ENHANCE_PROMPT_TO_PROMPT,
        }
    }
}

const ENHANCE_GENERATE_PROMPT: &str = r#"You are an expert prompt engineer for AI image generation. Transform simple user prompts into highly detailed, vivid, and professional prompts that will produce stunning AI-generated images.

Follow these guidelines:
- Expand simple ideas into rich, detailed descriptions
- Include artistic style, lighting, composition, and mood
- Add technical photography terms when relevant (e.g., "shot on 35mm", "bokeh", "golden hour")
- Specify colors, textures, and atmospheric details
- Keep the enhanced prompt concise but impactful (2-3 sentences max)
- Focus on visual details that will improve image quality
- Do not include negative prompts or what to avoid

Example:
Input: "a cat in space"
Output: "A majestic orange tabby cat floating gracefully in the cosmos, surrounded by vibrant nebulae in purple and blue hues, with distant galaxies twinkling in the background. Shot with cinematic lighting, capturing the ethereal glow of stardust particles around the cat's whiskers, creating a dreamlike sci-fi atmosphere with rich color depth and sharp focus.""#;

const ENHANCE_EDIT_PROMPT: &str = r#"You are an expert prompt engineer for AI image editing. Transform simple editing instructions into precise, detailed prompts that will guide the AI to make exactly the changes the user wants.

Follow these guidelines:
- Expand simple edit requests into specific, actionable instructions
- Describe the desired changes with visual precision
- Include details about style consistency and blending
- Specify lighting, color, and mood adjustments
- Keep the enhanced prompt focused and clear (2-3 sentences max)
- Ensure the edit maintains the original image's coherence

Example:
Input: "make it sunny"
Output: "Transform the scene into a bright sunny day with warm golden sunlight casting soft shadows, clear blue skies with few wispy clouds, and enhanced warm color tones throughout. Increase the overall brightness while maintaining natural contrast, add subtle lens flare effects, and adjust the atmosphere to feel cheerful and inviting.""#;

const ENHANCE_PROMPT_TO_PROMPT: &str = r#"You are an expert at analyzing images and creating detailed prompts. Based on the user's rough idea or the image they provide, create a comprehensive, detailed prompt that captures all the visual elements, style, composition, and atmosphere.

Follow these guidelines:
- Describe all key visual elements in the scene
- Include artistic style, medium, and technique
- Specify lighting, colors, and mood
- Add composition and framing details
- Include technical details that enhance quality
- Create a prompt that would recreate the essence of the image
- Keep it detailed but focused (3-4 sentences max)
- IMPORTANT: If the input is in Farsi (Persian/Arabic script), translate it to English first, then enhance it
- Always respond in English regardless of input language

Example:
Input: "cyberpunk city"
Output: "A sprawling neon-lit cyberpunk metropolis at night, with towering skyscrapers adorned with holographic advertisements in vibrant pink, cyan, and purple. Rain-slicked streets reflect the glowing signs while flying vehicles zip between buildings, creating light trails. Shot in cinematic widescreen with a moody, atmospheric style reminiscent of Blade Runner, featuring dramatic lighting contrasts and a misty, futuristic ambiance.""#;

pub const FARSI_NOTE: &str = "\n\nNOTE: The user input may be in Farsi (Persian). Please translate it to English first, then create the enhanced prompt in English.";

pub const IMAGE_ANALYSIS_PROMPT: &str = "Analyze this image in extreme detail. Describe the subject, composition, lighting, colors, mood, style, textures, and artistic elements. Create a comprehensive, vivid description suitable for AI image generation.";

pub fn text_enhance_prompt(idea: &str, style: Option<&str>, mood: Option<&str>) -> String {
    let style_text = style
        .filter(|s| !s.is_empty())
        .map(|s| format!("Style: {s}."))
        .unwrap_or_default();
    let mood_text = mood
        .filter(|m| !m.is_empty())
        .map(|m| format!("Mood: {m}."))
        .unwrap_or_default();

    format!(
        "You are a prompt engineering expert. Transform this idea into a hyper-detailed, vivid description for AI image generation. Elaborate on the scene, environment, lighting, colors, textures, and atmosphere. {style_text} {mood_text}\n\nIdea: \"{idea}\""
    )
}

pub fn model_prompts_request(description: &str, negative_prompt: Option<&str>) -> String {
    let negative = negative_prompt
        .filter(|n| !n.is_empty())
        .map(|n| format!("User wants to avoid: \"{n}\"."))
        .unwrap_or_default();

    format!(
        r#"Based on the following detailed description, generate optimized prompts for different AI models. Return ONLY valid JSON.

Description: "{description}"
{negative}

Generate prompts for these models:
- general: Universal detailed prompt (max 1000 chars)
- kling_ai: Cinematic focus with camera movements (max 1000 chars)
- ideogram: Natural language with style keywords (max 450 chars)
- leonardo_ai: Object with "prompt" and "negative_prompt" fields (max 1000 chars each)
- midjourney: Descriptive with parameters like --ar 16:9 (max 1500 chars)
- flux: Clear, highly descriptive (max 1000 chars)

JSON format:
{{
  "general": "...",
  "kling_ai": "...",
  "ideogram": "...",
  "leonardo_ai": {{"prompt": "...", "negative_prompt": "..."}},
  "midjourney": "...",
  "flux": "..."
}}"#
    )
}

pub const DEFAULT_REMIX_PROMPT: &str = "Creatively blend and fuse these images together into a single stunning, cohesive artwork. Maintain the best elements of each image while creating smooth transitions and a unified composition. The result should be visually striking and artistically impressive.";

pub fn single_remix_prompt(prompt: &str) -> String {
    format!("{prompt} Ultra high resolution, stunning details, professional quality.")
}

pub fn multi_remix_prompt(prompt: &str, image_count: usize) -> String {
    format!(
        "{prompt} Create an artistic fusion combining elements from {image_count} different images. Ultra high resolution, stunning composition, professional artistic quality, seamless blending."
    )
}
