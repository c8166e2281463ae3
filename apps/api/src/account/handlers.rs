use axum::{extract::State, Json};
use chrono::Utc;

use crate::account::SubscriptionSummary;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::account::{ProfileRow, ProfileUpdate};
use crate::state::AppState;

/// GET /api/v1/subscription
pub async fn handle_get_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SubscriptionSummary>, AppError> {
    let subscription = state.accounts.subscription(user.user_id).await?;
    Ok(Json(SubscriptionSummary::at(subscription, Utc::now())))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(state.accounts.profile(user.user_id).await?))
}

/// PATCH /api/v1/profile
///
/// Only the fields present in the body change.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(state.accounts.update_profile(user.user_id, &update).await?))
}
