//! Post generation: one brief in, one variation per requested platform out.
//!
//! `AppState` holds an `Arc<dyn ContentGenerator>`; the default backend is
//! `LlmContentGenerator`, which goes through the shared `LlmClient`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::brands::BrandContext;
use crate::brief::Brief;
use crate::craft::hashtags::dedup_hashtags;
use crate::generation::prompts::{build_system_prompt, build_user_prompt, generation_tool};
use crate::llm_client::{LlmClient, LlmError, GENERATION_MODEL};
use crate::models::platform::Platform;

/// One platform's post. `character_count` covers the body only; hashtags
/// are rendered separately and are not counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVariation {
    pub platform: Platform,
    pub content: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub character_count: usize,
}

impl PlatformVariation {
    pub fn new(platform: Platform, content: String, hashtags: Vec<String>) -> Self {
        let character_count = content.chars().count();
        Self {
            platform,
            content,
            hashtags,
            character_count,
        }
    }

    /// Replaces the body and recomputes the count.
    pub fn set_content(&mut self, content: String) {
        self.character_count = content.chars().count();
        self.content = content;
    }
}

/// Shape of the `generate_social_posts` tool arguments.
#[derive(Debug, Deserialize)]
struct GeneratedPosts {
    variations: Vec<RawVariation>,
}

#[derive(Debug, Deserialize)]
struct RawVariation {
    platform: String,
    content: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        brief: &Brief,
        brand: Option<&BrandContext>,
    ) -> Result<Vec<PlatformVariation>, LlmError>;
}

pub struct LlmContentGenerator {
    llm: LlmClient,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(
        &self,
        brief: &Brief,
        brand: Option<&BrandContext>,
    ) -> Result<Vec<PlatformVariation>, LlmError> {
        let system = build_system_prompt(brief, brand);
        let user = build_user_prompt(brief);
        let tool = generation_tool();

        let generated: GeneratedPosts = self
            .llm
            .call_tool(GENERATION_MODEL, &system, &user, &tool)
            .await?;

        let variations = accept_variations(&brief.platforms, generated.variations)
            .inspect_err(|e| warn!("Discarding generation for '{}': {e}", brief.title))?;

        info!(
            "Generated {} variation(s) for '{}'",
            variations.len(),
            brief.title
        );
        Ok(variations)
    }
}

/// Checks the model's output against the requested platforms and returns it
/// in request order. Exactly one entry per requested platform is required;
/// anything else rejects the whole batch.
fn accept_variations(
    requested: &[Platform],
    raw: Vec<RawVariation>,
) -> Result<Vec<PlatformVariation>, LlmError> {
    let mut slots: Vec<Option<PlatformVariation>> = vec![None; requested.len()];

    for item in raw {
        let platform: Platform = item
            .platform
            .parse()
            .map_err(|e| LlmError::Invalid(format!("{e}")))?;
        let index = requested
            .iter()
            .position(|p| *p == platform)
            .ok_or_else(|| LlmError::Invalid(format!("unrequested platform '{platform}'")))?;
        if slots[index].is_some() {
            return Err(LlmError::Invalid(format!("duplicate platform '{platform}'")));
        }
        slots[index] = Some(PlatformVariation::new(
            platform,
            item.content,
            dedup_hashtags(&item.hashtags),
        ));
    }

    slots
        .into_iter()
        .zip(requested)
        .map(|(slot, platform)| {
            slot.ok_or_else(|| LlmError::Invalid(format!("missing platform '{platform}'")))
        })
        .collect()
}
