use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The social platforms content can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Twitter,
    Linkedin,
    Facebook,
}

/// Static per-platform constraints and editorial guidance.
#[derive(Debug)]
pub struct PlatformSpec {
    pub display_name: &'static str,
    pub max_length: usize,
    pub style_guidance: &'static str,
    pub hashtag_guidance: &'static str,
    pub tips: [&'static str; 4],
}

const INSTAGRAM: PlatformSpec = PlatformSpec {
    display_name: "Instagram",
    max_length: 2200,
    style_guidance: "Visual storytelling, engaging, uses emojis, conversational. \
        Focus on lifestyle and visual appeal.",
    hashtag_guidance: "3-5",
    tips: [
        "Use line breaks to improve readability",
        "Place hashtags at the end or in first comment",
        "Include a clear call-to-action",
        "Emojis boost engagement by 47%",
    ],
};

const TWITTER: PlatformSpec = PlatformSpec {
    display_name: "Twitter/X",
    max_length: 280,
    style_guidance: "Concise, punchy, uses relevant hashtags sparingly. Direct and impactful.",
    hashtag_guidance: "1-2",
    tips: [
        "Keep it punchy and direct",
        "Use 1-2 hashtags max",
        "Ask questions to drive replies",
        "Threads work for longer content",
    ],
};

const LINKEDIN: PlatformSpec = PlatformSpec {
    display_name: "LinkedIn",
    max_length: 3000,
    style_guidance: "Professional, thought leadership, value-driven. \
        Use line breaks for readability.",
    hashtag_guidance: "3-5",
    tips: [
        "Hook readers in the first line",
        "Use professional but conversational tone",
        "Add 3-5 relevant hashtags",
        "Include industry insights or data",
    ],
};

const FACEBOOK: PlatformSpec = PlatformSpec {
    display_name: "Facebook",
    max_length: 500,
    style_guidance: "Conversational, community-focused, shareable. \
        Balance between casual and informative.",
    hashtag_guidance: "2-3",
    tips: [
        "Shorter posts get more engagement",
        "Ask questions to encourage comments",
        "Use emojis sparingly",
        "Include a clear value proposition",
    ],
};

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Facebook,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Facebook => "facebook",
        }
    }

    pub fn spec(self) -> &'static PlatformSpec {
        match self {
            Platform::Instagram => &INSTAGRAM,
            Platform::Twitter => &TWITTER,
            Platform::Linkedin => &LINKEDIN,
            Platform::Facebook => &FACEBOOK,
        }
    }

    pub fn max_length(self) -> usize {
        self.spec().max_length
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Accepts the platform id case-insensitively; the model sometimes echoes
    /// display names back ("LinkedIn", "Twitter/X").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "twitter" | "twitter/x" | "x" => Ok(Platform::Twitter),
            "linkedin" => Ok(Platform::Linkedin),
            "facebook" => Ok(Platform::Facebook),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_lengths() {
        assert_eq!(Platform::Instagram.max_length(), 2200);
        assert_eq!(Platform::Twitter.max_length(), 280);
        assert_eq!(Platform::Linkedin.max_length(), 3000);
        assert_eq!(Platform::Facebook.max_length(), 500);
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.id()));
        }
    }

    #[test]
    fn test_unknown_platform_rejected_by_serde() {
        let result: Result<Platform, _> = serde_json::from_str("\"myspace\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str_accepts_display_names() {
        assert_eq!("LinkedIn".parse::<Platform>(), Ok(Platform::Linkedin));
        assert_eq!("Twitter/X".parse::<Platform>(), Ok(Platform::Twitter));
        assert!("tiktok".parse::<Platform>().is_err());
    }
}
