use std::fmt;
use std::time::Duration;

use crate::rate_limit::RateLimitPolicy;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// A protected capability. Each one has its own rate limit bucket per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Chat,
    EditImage,
    GenerateImage,
    EnhancePrompt,
    ImageToPrompt,
    RemixImages,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Chat,
        Endpoint::EditImage,
        Endpoint::GenerateImage,
        Endpoint::EnhancePrompt,
        Endpoint::ImageToPrompt,
        Endpoint::RemixImages,
    ];

    /// Namespace used in rate limit keys.
    pub fn key_prefix(self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::EditImage => "edit",
            Endpoint::GenerateImage => "generate",
            Endpoint::EnhancePrompt => "enhance",
            Endpoint::ImageToPrompt => "imgprompt",
            Endpoint::RemixImages => "remix",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::EditImage => "edit-image",
            Endpoint::GenerateImage => "generate-image",
            Endpoint::EnhancePrompt => "enhance-prompt",
            Endpoint::ImageToPrompt => "image-to-prompt",
            Endpoint::RemixImages => "remix-images",
        }
    }

    pub fn path(self) -> String {
        format!("/{}", self.name())
    }

    /// Requests admitted per window for one client.
    pub fn limit(self) -> u32 {
        match self {
            Endpoint::Chat => 30,
            Endpoint::EditImage => 10,
            Endpoint::GenerateImage => 10,
            Endpoint::EnhancePrompt => 20,
            Endpoint::ImageToPrompt => 15,
            Endpoint::RemixImages => 10,
        }
    }

    pub fn policy(self, window: Duration) -> RateLimitPolicy {
        RateLimitPolicy::new(self.limit(), window)
    }

    pub fn client_key(self, client_id: &str) -> String {
        format!("{}:{}", self.key_prefix(), client_id)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_per_endpoint() {
        let limits: Vec<(&str, u32)> = Endpoint::ALL
            .iter()
            .map(|e| (e.name(), e.limit()))
            .collect();
        assert_eq!(
            limits,
            vec![
                ("chat", 30),
                ("edit-image", 10),
                ("generate-image", 10),
                ("enhance-prompt", 20),
                ("image-to-prompt", 15),
                ("remix-images", 10),
            ]
        );
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(Endpoint::EditImage.client_key("1.2.3.4"), "edit:1.2.3.4");
        assert_eq!(Endpoint::ImageToPrompt.client_key("unknown"), "imgprompt:unknown");
        assert_ne!(
            Endpoint::GenerateImage.client_key("a"),
            Endpoint::RemixImages.client_key("a")
        );
    }

    #[test]
    fn policy_carries_window() {
        let policy = Endpoint::Chat.policy(DEFAULT_WINDOW);
        assert_eq!(policy.limit, 30);
        assert_eq!(policy.window_ms(), 60_000);
        assert_eq!(Endpoint::RemixImages.path(), "/remix-images");
    }
}
