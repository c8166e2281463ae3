use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::craft::hashtags::{add_hashtag, remove_hashtag};
use crate::craft::transforms::{
    insert_at_cursor, insert_cta, insert_emoji, paragraph_breaks, Selection,
};
use crate::craft::{render_preview, CharacterReport};
use crate::errors::AppError;
use crate::generation::generator::PlatformVariation;
use crate::models::platform::Platform;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CraftAction {
    /// Recompute the report and preview without changing anything.
    Inspect,
    SetContent {
        content: String,
    },
    Insert {
        text: String,
        #[serde(default)]
        selection: Option<Selection>,
    },
    InsertEmoji {
        emoji: String,
        #[serde(default)]
        selection: Option<Selection>,
    },
    InsertCta {
        #[serde(default)]
        selection: Option<Selection>,
    },
    ParagraphBreaks,
    AddHashtag {
        tag: String,
    },
    RemoveHashtag {
        tag: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct CraftRequest {
    pub variation: PlatformVariation,
    pub action: CraftAction,
}

#[derive(Debug, Serialize)]
pub struct CraftResponse {
    pub variation: PlatformVariation,
    pub report: CharacterReport,
    pub preview: String,
    /// Char index after inserted text, for insert actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

/// How `maxLength` and every character report count text.
pub const COUNT_UNIT: &str = "unicode_scalar_values";

/// Editor metadata for one platform.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub id: Platform,
    pub display_name: &'static str,
    pub max_length: usize,
    pub count_unit: &'static str,
    pub hashtag_guidance: &'static str,
    pub tips: [&'static str; 4],
}

/// GET /api/v1/platforms
///
/// `maxLength` is measured in Unicode scalar values, the same unit the craft
/// report counts in. An emoji made of several code points (a flag, a skin
/// tone, a ZWJ family) counts once per code point, and hashtags are not
/// included in the count.
pub async fn handle_list_platforms(_user: AuthUser) -> Json<Vec<PlatformInfo>> {
    let platforms = Platform::ALL
        .iter()
        .map(|&id| {
            let spec = id.spec();
            PlatformInfo {
                id,
                display_name: spec.display_name,
                max_length: spec.max_length,
                count_unit: COUNT_UNIT,
                hashtag_guidance: spec.hashtag_guidance,
                tips: spec.tips,
            }
        })
        .collect();
    Json(platforms)
}

/// POST /api/v1/craft
pub async fn handle_craft(
    _user: AuthUser,
    Json(request): Json<CraftRequest>,
) -> Result<Json<CraftResponse>, AppError> {
    let (variation, cursor) = apply_action(request.variation, request.action)?;
    Ok(Json(CraftResponse {
        report: CharacterReport::for_variation(&variation),
        preview: render_preview(&variation),
        variation,
        cursor,
    }))
}

fn apply_action(
    mut variation: PlatformVariation,
    action: CraftAction,
) -> Result<(PlatformVariation, Option<usize>), AppError> {
    let mut cursor = None;
    match action {
        CraftAction::Inspect => {}
        CraftAction::SetContent { content } => variation.set_content(content),
        CraftAction::Insert { text, selection } => {
            let edited = insert_at_cursor(&variation.content, selection, &text);
            cursor = Some(edited.cursor);
            variation.set_content(edited.content);
        }
        CraftAction::InsertEmoji { emoji, selection } => {
            let edited = insert_emoji(&variation.content, selection, &emoji)
                .ok_or_else(|| AppError::Validation(format!("'{emoji}' is not a quick emoji")))?;
            cursor = Some(edited.cursor);
            variation.set_content(edited.content);
        }
        CraftAction::InsertCta { selection } => {
            let edited = insert_cta(&variation.content, selection);
            cursor = Some(edited.cursor);
            variation.set_content(edited.content);
        }
        CraftAction::ParagraphBreaks => {
            let formatted = paragraph_breaks(&variation.content);
            variation.set_content(formatted);
        }
        CraftAction::AddHashtag { tag } => {
            add_hashtag(&mut variation.hashtags, &tag);
        }
        CraftAction::RemoveHashtag { tag } => {
            remove_hashtag(&mut variation.hashtags, &tag);
        }
    }
    // Clients may send a stale count; the body is the source of truth.
    variation.character_count = variation.content.chars().count();
    Ok((variation, cursor))
}
