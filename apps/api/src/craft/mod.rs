//! Craft editor operations on a single variation.
//!
//! Nothing here blocks editing or saving: an over-limit post is reported,
//! never rejected.

pub mod handlers;
pub mod hashtags;
pub mod transforms;

use serde::Serialize;

use crate::generation::generator::PlatformVariation;

const NEAR_LIMIT_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterReport {
    pub count: usize,
    pub max: usize,
    /// Negative once over the limit.
    pub remaining: i64,
    /// Share of the limit used, capped at 100.
    pub percent: f64,
    pub over_limit: bool,
    pub near_limit: bool,
    pub over_by: usize,
}

impl CharacterReport {
    pub fn for_variation(variation: &PlatformVariation) -> Self {
        let count = variation.content.chars().count();
        let max = variation.platform.max_length();
        let percent = if max == 0 {
            100.0
        } else {
            (count as f64 / max as f64 * 100.0).min(100.0)
        };
        let over_limit = count > max;
        Self {
            count,
            max,
            remaining: max as i64 - count as i64,
            percent,
            over_limit,
            near_limit: percent > NEAR_LIMIT_PERCENT && !over_limit,
            over_by: count.saturating_sub(max),
        }
    }
}

/// The post as it will appear: body, then the tags on their own line.
pub fn render_preview(variation: &PlatformVariation) -> String {
    if variation.hashtags.is_empty() {
        return variation.content.clone();
    }
    let tags = variation
        .hashtags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}\n\n{}", variation.content, tags)
}
