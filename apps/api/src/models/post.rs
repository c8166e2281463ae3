use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of `content_library`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub title: String,
    /// Canonical body: the first variation's content at save time.
    pub content: String,
    pub media_urls: Vec<String>,
    pub platforms: Vec<String>,
    pub status: String,
    pub hashtags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub ai_variations: Json<Vec<StoredVariation>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentPostRow {
    /// Parsed status. Rows are constrained by a CHECK so this only fails on
    /// a schema drift.
    pub fn status(&self) -> Result<PostStatus, UnknownStatus> {
        self.status.parse()
    }
}

/// A platform variation as folded into `ContentPost.ai_variations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVariation {
    pub platform: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }

    /// Lifecycle: draft → scheduled → published, draft → published, and
    /// scheduled → draft to unschedule. Re-saving in the same state is allowed.
    /// Nothing leaves `published`.
    pub fn can_transition_to(self, next: PostStatus) -> bool {
        use PostStatus::*;
        matches!(
            (self, next),
            (Draft, Draft)
                | (Draft, Scheduled)
                | (Draft, Published)
                | (Scheduled, Scheduled)
                | (Scheduled, Published)
                | (Scheduled, Draft)
                | (Published, Published)
        )
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown post status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PostStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Insert payload for `content_library`.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub media_urls: Vec<String>,
    pub platforms: Vec<String>,
    pub status: PostStatus,
    pub hashtags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub ai_variations: Vec<StoredVariation>,
}

/// Full replacement of the editable columns, as the edit dialog re-submits
/// the whole record.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub platforms: Vec<String>,
    pub status: PostStatus,
    pub hashtags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Library list filters. All optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilters {
    pub status: Option<PostStatus>,
    pub platform: Option<String>,
    pub brand_id: Option<Uuid>,
    pub search: Option<String>,
}

#[cfg(test)]
impl PostFilters {
    /// In-process mirror of the SQL filter, used by the in-memory repository.
    pub fn matches(&self, post: &ContentPostRow) -> bool {
        if let Some(status) = self.status {
            if post.status != status.as_str() {
                return false;
            }
        }
        if let Some(platform) = &self.platform {
            if !post.platforms.iter().any(|p| p == platform) {
                return false;
            }
        }
        if let Some(brand_id) = self.brand_id {
            if post.brand_id != Some(brand_id) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !post.title.to_lowercase().contains(&needle)
                && !post.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}
