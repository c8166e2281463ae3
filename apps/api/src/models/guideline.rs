use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BrandGuidelineRow {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    /// AI summary of the document. Null until parsing has produced one.
    pub parsed_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGuideline {
    pub brand_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub parsed_content: Option<String>,
}
