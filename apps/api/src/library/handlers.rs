//! Axum route handlers for the library, dashboard and calendar.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::finalize::client_offset;
use crate::library::repository::LibraryTotals;
use crate::library::{apply_edit, day_window, PostEdit, DASHBOARD_LIST_LEN};
use crate::models::post::{ContentPostRow, PostFilters};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub totals: LibraryTotals,
    pub recent: Vec<ContentPostRow>,
    pub upcoming: Vec<ContentPostRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub date: NaiveDate,
    /// Viewer's offset east of UTC in minutes; absent means UTC.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub date: NaiveDate,
    pub posts: Vec<ContentPostRow>,
}

fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/library
pub async fn handle_list_posts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filters): Query<PostFilters>,
) -> Result<Json<Vec<ContentPostRow>>, AppError> {
    Ok(Json(state.posts.list(user.user_id, &filters).await?))
}

/// GET /api/v1/library/:id
pub async fn handle_get_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentPostRow>, AppError> {
    state
        .posts
        .get(user.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| post_not_found(id))
}

/// PATCH /api/v1/library/:id
///
/// Edits a saved post. Status changes follow the post lifecycle; entering
/// `published` stamps `published_at` once.
pub async fn handle_update_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(edit): Json<PostEdit>,
) -> Result<Json<ContentPostRow>, AppError> {
    let current = state
        .posts
        .get(user.user_id, id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    let update = apply_edit(&current, edit, Utc::now())?;

    state
        .posts
        .update(user.user_id, id, &update)
        .await?
        .map(Json)
        .ok_or_else(|| post_not_found(id))
}

/// DELETE /api/v1/library/:id
pub async fn handle_delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.posts.delete(user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(post_not_found(id))
    }
}

/// GET /api/v1/dashboard
///
/// Totals per status, the most recent posts, and the next scheduled ones.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let totals = state.posts.totals(user.user_id).await?;

    let mut recent = state
        .posts
        .list(user.user_id, &PostFilters::default())
        .await?;
    recent.truncate(DASHBOARD_LIST_LEN as usize);

    let upcoming = state
        .posts
        .scheduled(user.user_id, None, Some(DASHBOARD_LIST_LEN))
        .await?;

    Ok(Json(DashboardResponse {
        totals,
        recent,
        upcoming,
    }))
}

/// GET /api/v1/calendar?date=YYYY-MM-DD&utcOffsetMinutes=N
///
/// Posts whose schedule falls on the viewer's calendar day, whatever their
/// status.
pub async fn handle_calendar(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let offset = client_offset(query.utc_offset_minutes)?;
    let window = day_window(query.date, offset)?;
    let posts = state
        .posts
        .scheduled(user.user_id, Some(window), None)
        .await?;
    Ok(Json(CalendarResponse {
        date: query.date,
        posts,
    }))
}
