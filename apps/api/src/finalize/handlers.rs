use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::finalize::{build_post, resolve_schedule, FinalizeRequest};
use crate::models::post::ContentPostRow;
use crate::state::AppState;

/// POST /api/v1/finalize
///
/// Persists the crafted variations as one library record. A schedule is read
/// in the author's zone. Nothing is retried; a failed insert leaves no row
/// behind.
pub async fn handle_finalize(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<FinalizeRequest>,
) -> Result<(StatusCode, Json<ContentPostRow>), AppError> {
    let now = Utc::now();
    let scheduled_at = request
        .schedule
        .as_ref()
        .map(|schedule| resolve_schedule(schedule, now))
        .transpose()?;

    let post = build_post(user.user_id, request, scheduled_at, now)?;
    let saved = state.posts.create(post).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}
