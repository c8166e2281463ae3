use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::brand::{BrandInput, BrandRow};

/// Brand persistence. Every method is scoped to the owning user; another
/// user's brand behaves exactly like a missing one.
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<BrandRow>, AppError>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<BrandRow>, AppError>;
    async fn create(&self, user_id: Uuid, input: &BrandInput) -> Result<BrandRow, AppError>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &BrandInput,
    ) -> Result<Option<BrandRow>, AppError>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgBrandRepository {
    pool: PgPool,
}

impl PgBrandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<BrandRow>, AppError> {
        let rows = sqlx::query_as::<_, BrandRow>(
            "SELECT * FROM brands WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<BrandRow>, AppError> {
        let row = sqlx::query_as::<_, BrandRow>("SELECT * FROM brands WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, user_id: Uuid, input: &BrandInput) -> Result<BrandRow, AppError> {
        let row = sqlx::query_as::<_, BrandRow>(
            r#"
            INSERT INTO brands
                (user_id, name, website_url, instagram_handle, twitter_handle,
                 linkedin_handle, facebook_handle, logo_url, primary_color,
                 secondary_color, voice_characteristics, brand_essence,
                 target_audience, content_themes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.website_url)
        .bind(&input.instagram_handle)
        .bind(&input.twitter_handle)
        .bind(&input.linkedin_handle)
        .bind(&input.facebook_handle)
        .bind(&input.logo_url)
        .bind(&input.primary_color)
        .bind(&input.secondary_color)
        .bind(&input.voice_characteristics)
        .bind(Json(&input.brand_essence))
        .bind(Json(&input.target_audience))
        .bind(&input.content_themes)
        .fetch_one(&self.pool)
        .await?;

        info!("Created brand {} for user {user_id}", row.id);
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &BrandInput,
    ) -> Result<Option<BrandRow>, AppError> {
        let row = sqlx::query_as::<_, BrandRow>(
            r#"
            UPDATE brands SET
                name = $3, website_url = $4, instagram_handle = $5,
                twitter_handle = $6, linkedin_handle = $7, facebook_handle = $8,
                logo_url = $9, primary_color = $10, secondary_color = $11,
                voice_characteristics = $12, brand_essence = $13,
                target_audience = $14, content_themes = $15, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.website_url)
        .bind(&input.instagram_handle)
        .bind(&input.twitter_handle)
        .bind(&input.linkedin_handle)
        .bind(&input.facebook_handle)
        .bind(&input.logo_url)
        .bind(&input.primary_color)
        .bind(&input.secondary_color)
        .bind(&input.voice_characteristics)
        .bind(Json(&input.brand_essence))
        .bind(Json(&input.target_audience))
        .bind(&input.content_themes)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            info!("Updated brand {id}");
        }
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted brand {id}");
        }
        Ok(deleted)
    }
}
