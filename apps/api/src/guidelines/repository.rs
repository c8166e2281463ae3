use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::guideline::{BrandGuidelineRow, NewGuideline};

/// Guideline persistence. Ownership is derived from the parent brand.
#[async_trait]
pub trait GuidelineRepository: Send + Sync {
    /// The brand's guidelines, newest first. Empty when the brand is not the
    /// caller's.
    async fn list(&self, user_id: Uuid, brand_id: Uuid) -> Result<Vec<BrandGuidelineRow>, AppError>;

    /// Parsed summaries of a brand's guidelines, oldest first, skipping
    /// documents that were never parsed.
    async fn parsed_contents(&self, brand_id: Uuid) -> Result<Vec<String>, AppError>;

    async fn insert(&self, guideline: NewGuideline) -> Result<BrandGuidelineRow, AppError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgGuidelineRepository {
    pool: PgPool,
}

impl PgGuidelineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuidelineRepository for PgGuidelineRepository {
    async fn list(&self, user_id: Uuid, brand_id: Uuid) -> Result<Vec<BrandGuidelineRow>, AppError> {
        let rows = sqlx::query_as::<_, BrandGuidelineRow>(
            r#"
            SELECT g.* FROM brand_guidelines g
            JOIN brands b ON b.id = g.brand_id
            WHERE g.brand_id = $1 AND b.user_id = $2
            ORDER BY g.created_at DESC
            "#,
        )
        .bind(brand_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn parsed_contents(&self, brand_id: Uuid) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT parsed_content FROM brand_guidelines
            WHERE brand_id = $1 AND parsed_content IS NOT NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(content,)| content).collect())
    }

    async fn insert(&self, guideline: NewGuideline) -> Result<BrandGuidelineRow, AppError> {
        let row = sqlx::query_as::<_, BrandGuidelineRow>(
            r#"
            INSERT INTO brand_guidelines (brand_id, file_name, file_type, file_url, parsed_content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(guideline.brand_id)
        .bind(&guideline.file_name)
        .bind(&guideline.file_type)
        .bind(&guideline.file_url)
        .bind(&guideline.parsed_content)
        .fetch_one(&self.pool)
        .await?;

        info!("Stored guideline {} for brand {}", row.id, row.brand_id);
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM brand_guidelines g
            USING brands b
            WHERE g.id = $1 AND b.id = g.brand_id AND b.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted guideline {id}");
        }
        Ok(deleted)
    }
}
