// Prompt text and tool schema for post generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::json;

use crate::brands::BrandContext;
use crate::brief::Brief;
use crate::llm_client::prompts::NO_BRAND_CONTEXT;
use crate::llm_client::ToolSpec;

pub const GENERATE_TOOL_NAME: &str = "generate_social_posts";

const GENERATION_SYSTEM_TEMPLATE: &str = "You are an expert social media content creator. \
Generate engaging, on-brand content for different social media platforms.

{brand_context}

CONTENT REQUIREMENTS:
- Create unique, tailored content for each platform
- Maintain consistent messaging while adapting to each platform's style
- Include relevant hashtags ({hashtag_counts})
- {image_context}
- Make content engaging and shareable
- Stay within character limits for each platform";

const GENERATION_USER_TEMPLATE: &str = "Create social media posts for the following:

POST TITLE: {title}

CREATIVE DIRECTION: {direction}

PLATFORMS TO CREATE FOR:
{platform_lines}

Return exactly one variation per platform listed above, using the platform id as given.";

pub fn generation_tool() -> ToolSpec {
    ToolSpec {
        name: GENERATE_TOOL_NAME,
        description: "Generate social media post variations for different platforms",
        parameters: json!({
            "type": "object",
            "properties": {
                "variations": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "platform": { "type": "string", "description": "Social media platform name" },
                            "content": { "type": "string", "description": "The post content" },
                            "hashtags": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "Relevant hashtags without the # symbol"
                            }
                        },
                        "required": ["platform", "content", "hashtags"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["variations"],
            "additionalProperties": false
        }),
    }
}

pub fn build_system_prompt(brief: &Brief, brand: Option<&BrandContext>) -> String {
    let brand_context = match brand {
        Some(ctx) => format!("BRAND CONTEXT:\n{}", ctx.render()),
        None => NO_BRAND_CONTEXT.to_string(),
    };

    let hashtag_counts = brief
        .platforms
        .iter()
        .map(|p| format!("{} for {}", p.spec().hashtag_guidance, p.spec().display_name))
        .collect::<Vec<_>>()
        .join(", ");

    let image_context = match brief.image_urls.len() {
        0 => "This is a text-only post without images.".to_string(),
        n => format!("The post includes {n} image(s). Reference or complement the visual content."),
    };

    GENERATION_SYSTEM_TEMPLATE
        .replace("{brand_context}", &brand_context)
        .replace("{hashtag_counts}", &hashtag_counts)
        .replace("{image_context}", &image_context)
}

pub fn build_user_prompt(brief: &Brief) -> String {
    let platform_lines = brief
        .platforms
        .iter()
        .map(|p| {
            format!(
                "- {}: Max {} characters. Style: {}",
                p.id(),
                p.max_length(),
                p.spec().style_guidance
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    GENERATION_USER_TEMPLATE
        .replace("{title}", brief.title.trim())
        .replace("{direction}", brief.direction.trim())
        .replace("{platform_lines}", &platform_lines)
}
