use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{ProfileRow, ProfileUpdate, SubscriptionRow};

/// Per-user subscription and profile rows. Both are created on first access
/// with the schema defaults (14-day trial, empty profile).
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn subscription(&self, user_id: Uuid) -> Result<SubscriptionRow, AppError>;
    async fn profile(&self, user_id: Uuid) -> Result<ProfileRow, AppError>;
    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<ProfileRow, AppError>;
}

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn subscription(&self, user_id: Uuid) -> Result<SubscriptionRow, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (user_id) VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn profile(&self, user_id: Uuid) -> Result<ProfileRow, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id) VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<ProfileRow, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, full_name, company_name, avatar_url, onboarding_completed)
            VALUES ($1, $2, $3, $4, COALESCE($5, false))
            ON CONFLICT (user_id) DO UPDATE SET
                full_name            = COALESCE($2, profiles.full_name),
                company_name         = COALESCE($3, profiles.company_name),
                avatar_url           = COALESCE($4, profiles.avatar_url),
                onboarding_completed = COALESCE($5, profiles.onboarding_completed),
                updated_at           = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&update.full_name)
        .bind(&update.company_name)
        .bind(&update.avatar_url)
        .bind(update.onboarding_completed)
        .fetch_one(&self.pool)
        .await?;

        info!("Updated profile for user {user_id}");
        Ok(row)
    }
}
