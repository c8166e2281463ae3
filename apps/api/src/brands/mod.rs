//! Brand profiles and the context they contribute to generation prompts.

pub mod handlers;
pub mod repository;

use thiserror::Error;
use uuid::Uuid;

use crate::brands::repository::BrandRepository;
use crate::errors::AppError;
use crate::guidelines::repository::GuidelineRepository;
use crate::llm_client::prompts::join_or_unspecified;
use crate::models::brand::{BrandEssence, BrandInput, BrandRow};

pub const MAX_VOICE_TAGS: usize = 3;

pub const VOICE_OPTIONS: [&str; 10] = [
    "Professional",
    "Friendly",
    "Bold",
    "Confident",
    "Warm",
    "Casual",
    "Authoritative",
    "Playful",
    "Inspirational",
    "Educational",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrandError {
    #[error("Please enter a brand name")]
    MissingName,
    #[error("Choose at most {} voice characteristics", MAX_VOICE_TAGS)]
    TooManyVoiceTags,
    #[error("Unknown voice characteristic '{0}'")]
    UnknownVoiceTag(String),
}

impl From<BrandError> for AppError {
    fn from(err: BrandError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Trims the name and checks the voice tags against the fixed option list.
pub fn validate_brand_input(mut input: BrandInput) -> Result<BrandInput, BrandError> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(BrandError::MissingName);
    }
    if input.voice_characteristics.len() > MAX_VOICE_TAGS {
        return Err(BrandError::TooManyVoiceTags);
    }
    if let Some(unknown) = input
        .voice_characteristics
        .iter()
        .find(|v| !VOICE_OPTIONS.contains(&v.as_str()))
    {
        return Err(BrandError::UnknownVoiceTag(unknown.clone()));
    }
    Ok(input)
}

/// What a brand contributes to a generation prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandContext {
    pub name: String,
    pub voice: Vec<String>,
    pub themes: Vec<String>,
    pub essence: BrandEssence,
    /// Parsed guideline summaries, oldest first.
    pub guidelines: Vec<String>,
}

impl BrandContext {
    pub fn from_row(brand: &BrandRow, guidelines: Vec<String>) -> Self {
        Self {
            name: brand.name.clone(),
            voice: brand.voice_characteristics.clone(),
            themes: brand.content_themes.clone(),
            essence: brand.brand_essence.0.clone(),
            guidelines,
        }
    }

    pub fn render(&self) -> String {
        let essence = serde_json::to_string(&self.essence)
            .unwrap_or_else(|_| "Not specified".to_string());
        let mut out = format!(
            "Brand Name: {}\nVoice Characteristics: {}\nContent Themes: {}\nBrand Essence: {}\n",
            self.name,
            join_or_unspecified(&self.voice),
            join_or_unspecified(&self.themes),
            essence
        );
        if !self.guidelines.is_empty() {
            out.push_str("\n\nBrand Guidelines:\n");
            out.push_str(&self.guidelines.join("\n\n"));
        }
        out
    }
}

/// Loads the caller's brand and its parsed guidelines. A brand that does not
/// exist (or belongs to someone else) yields no context rather than an error.
pub async fn load_brand_context(
    brands: &dyn BrandRepository,
    guidelines: &dyn GuidelineRepository,
    user_id: Uuid,
    brand_id: Uuid,
) -> Result<Option<BrandContext>, AppError> {
    let Some(brand) = brands.get(user_id, brand_id).await? else {
        return Ok(None);
    };
    let parsed = guidelines.parsed_contents(brand.id).await?;
    Ok(Some(BrandContext::from_row(&brand, parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, voice: &[&str]) -> BrandInput {
        BrandInput {
            name: name.to_string(),
            voice_characteristics: voice.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_required() {
        assert_eq!(
            validate_brand_input(input("  ", &[])).unwrap_err(),
            BrandError::MissingName
        );
    }

    #[test]
    fn test_name_trimmed() {
        let validated = validate_brand_input(input("  Acme ", &["Bold"])).unwrap();
        assert_eq!(validated.name, "Acme");
    }

    #[test]
    fn test_at_most_three_voice_tags() {
        assert!(validate_brand_input(input("Acme", &["Bold", "Warm", "Casual"])).is_ok());
        assert_eq!(
            validate_brand_input(input("Acme", &["Bold", "Warm", "Casual", "Playful"])).unwrap_err(),
            BrandError::TooManyVoiceTags
        );
    }

    #[test]
    fn test_unknown_voice_tag_rejected() {
        assert_eq!(
            validate_brand_input(input("Acme", &["Snarky"])).unwrap_err(),
            BrandError::UnknownVoiceTag("Snarky".to_string())
        );
    }

    #[test]
    fn test_render_without_guidelines() {
        let ctx = BrandContext {
            name: "Acme".to_string(),
            voice: vec![],
            themes: vec!["AI".to_string(), "Dev tools".to_string()],
            essence: BrandEssence {
                mission: "Ship faster".to_string(),
                values: vec![],
                usp: String::new(),
            },
            guidelines: vec![],
        };
        let rendered = ctx.render();
        assert!(rendered.contains("Voice Characteristics: Not specified"));
        assert!(rendered.contains("Content Themes: AI, Dev tools"));
        assert!(rendered.contains(r#""mission":"Ship faster""#));
        assert!(!rendered.contains("Brand Guidelines"));
    }

    #[test]
    fn test_render_joins_guidelines_with_blank_lines() {
        let ctx = BrandContext {
            name: "Acme".to_string(),
            voice: vec!["Bold".to_string()],
            themes: vec![],
            essence: BrandEssence::default(),
            guidelines: vec!["First.".to_string(), "Second.".to_string()],
        };
        assert!(ctx.render().ends_with("Brand Guidelines:\nFirst.\n\nSecond."));
    }
}
