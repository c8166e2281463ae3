use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BrandRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub website_url: Option<String>,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub linkedin_handle: Option<String>,
    pub facebook_handle: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub voice_characteristics: Vec<String>,
    pub brand_essence: Json<BrandEssence>,
    pub target_audience: Json<Vec<AudienceSegment>>,
    pub content_themes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandEssence {
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub usp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceSegment {
    pub name: String,
    pub description: String,
}

/// Writable brand columns. Used for both insert and full update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    pub name: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub twitter_handle: Option<String>,
    #[serde(default)]
    pub linkedin_handle: Option<String>,
    #[serde(default)]
    pub facebook_handle: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub voice_characteristics: Vec<String>,
    #[serde(default)]
    pub brand_essence: BrandEssence,
    #[serde(default)]
    pub target_audience: Vec<AudienceSegment>,
    #[serde(default)]
    pub content_themes: Vec<String>,
}

impl BrandRow {
    /// The editable view of this row, used as the base for partial updates.
    pub fn to_input(&self) -> BrandInput {
        BrandInput {
            name: self.name.clone(),
            website_url: self.website_url.clone(),
            instagram_handle: self.instagram_handle.clone(),
            twitter_handle: self.twitter_handle.clone(),
            linkedin_handle: self.linkedin_handle.clone(),
            facebook_handle: self.facebook_handle.clone(),
            logo_url: self.logo_url.clone(),
            primary_color: self.primary_color.clone(),
            secondary_color: self.secondary_color.clone(),
            voice_characteristics: self.voice_characteristics.clone(),
            brand_essence: self.brand_essence.0.clone(),
            target_audience: self.target_audience.0.clone(),
            content_themes: self.content_themes.clone(),
        }
    }
}
