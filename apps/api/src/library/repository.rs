use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::post::{ContentPostRow, NewPost, PostFilters, PostUpdate};

/// Per-status post counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct LibraryTotals {
    pub total: i64,
    pub scheduled: i64,
    pub published: i64,
    pub drafts: i64,
}

/// Content library persistence, scoped to the owning user.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<ContentPostRow, AppError>;

    /// Newest first.
    async fn list(&self, user_id: Uuid, filters: &PostFilters) -> Result<Vec<ContentPostRow>, AppError>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<ContentPostRow>, AppError>;

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &PostUpdate,
    ) -> Result<Option<ContentPostRow>, AppError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn totals(&self, user_id: Uuid) -> Result<LibraryTotals, AppError>;

    /// Posts carrying a `scheduled_at`, whatever their status, ordered by it
    /// ascending and optionally restricted to `[from, to)`.
    async fn scheduled(
        &self,
        user_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        limit: Option<i64>,
    ) -> Result<Vec<ContentPostRow>, AppError>;
}

pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn create(&self, post: NewPost) -> Result<ContentPostRow, AppError> {
        let row = sqlx::query_as::<_, ContentPostRow>(
            r#"
            INSERT INTO content_library
                (user_id, brand_id, title, content, media_urls, platforms, status,
                 hashtags, scheduled_at, published_at, ai_variations)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(post.user_id)
        .bind(post.brand_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.media_urls)
        .bind(&post.platforms)
        .bind(post.status.as_str())
        .bind(&post.hashtags)
        .bind(post.scheduled_at)
        .bind(post.published_at)
        .bind(Json(&post.ai_variations))
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Saved post {} ({}) for user {}",
            row.id, row.status, row.user_id
        );
        Ok(row)
    }

    async fn list(&self, user_id: Uuid, filters: &PostFilters) -> Result<Vec<ContentPostRow>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM content_library WHERE user_id = ");
        query.push_bind(user_id);

        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(platform) = &filters.platform {
            query.push(" AND ").push_bind(platform.clone()).push(" = ANY(platforms)");
        }
        if let Some(brand_id) = filters.brand_id {
            query.push(" AND brand_id = ").push_bind(brand_id);
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query
            .build_query_as::<ContentPostRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<ContentPostRow>, AppError> {
        let row = sqlx::query_as::<_, ContentPostRow>(
            "SELECT * FROM content_library WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &PostUpdate,
    ) -> Result<Option<ContentPostRow>, AppError> {
        let row = sqlx::query_as::<_, ContentPostRow>(
            r#"
            UPDATE content_library SET
                title = $3, content = $4, platforms = $5, status = $6,
                hashtags = $7, scheduled_at = $8, published_at = $9,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.platforms)
        .bind(update.status.as_str())
        .bind(&update.hashtags)
        .bind(update.scheduled_at)
        .bind(update.published_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            info!("Updated post {} ({})", row.id, row.status);
        }
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM content_library WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted post {id}");
        }
        Ok(deleted)
    }

    async fn totals(&self, user_id: Uuid) -> Result<LibraryTotals, AppError> {
        let totals = sqlx::query_as::<_, LibraryTotals>(
            r#"
            SELECT
                COUNT(*)                                     AS total,
                COUNT(*) FILTER (WHERE status = 'scheduled') AS scheduled,
                COUNT(*) FILTER (WHERE status = 'published') AS published,
                COUNT(*) FILTER (WHERE status = 'draft')     AS drafts
            FROM content_library
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn scheduled(
        &self,
        user_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        limit: Option<i64>,
    ) -> Result<Vec<ContentPostRow>, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT * FROM content_library WHERE scheduled_at IS NOT NULL AND user_id = ",
        );
        query.push_bind(user_id);
        if let Some((from, to)) = window {
            query
                .push(" AND scheduled_at >= ")
                .push_bind(from)
                .push(" AND scheduled_at < ")
                .push_bind(to);
        }
        query.push(" ORDER BY scheduled_at ASC");
        if let Some(limit) = limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query
            .build_query_as::<ContentPostRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Escapes LIKE wildcards so a search for "50%" matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
