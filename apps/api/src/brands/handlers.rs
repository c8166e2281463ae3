//! Axum route handlers for the Brands API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::brands::validate_brand_input;
use crate::errors::AppError;
use crate::models::brand::{BrandInput, BrandRow};
use crate::state::AppState;

fn brand_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Brand {id} not found"))
}

/// GET /api/v1/brands
pub async fn handle_list_brands(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<BrandRow>>, AppError> {
    Ok(Json(state.brands.list(user.user_id).await?))
}

/// POST /api/v1/brands
pub async fn handle_create_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BrandInput>,
) -> Result<(StatusCode, Json<BrandRow>), AppError> {
    let input = validate_brand_input(input)?;
    let brand = state.brands.create(user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// GET /api/v1/brands/:id
pub async fn handle_get_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BrandRow>, AppError> {
    state
        .brands
        .get(user.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| brand_not_found(id))
}

/// PATCH /api/v1/brands/:id
///
/// Partial update: fields present in the body replace the stored ones, the
/// rest are kept. The merged record is validated as a whole.
pub async fn handle_update_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<Value>,
) -> Result<Json<BrandRow>, AppError> {
    let current = state
        .brands
        .get(user.user_id, id)
        .await?
        .ok_or_else(|| brand_not_found(id))?;

    let merged = merge_patch(&current.to_input(), patch)?;
    let input = validate_brand_input(merged)?;

    state
        .brands
        .update(user.user_id, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| brand_not_found(id))
}

/// DELETE /api/v1/brands/:id
pub async fn handle_delete_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.brands.delete(user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(brand_not_found(id))
    }
}

fn merge_patch(current: &BrandInput, patch: Value) -> Result<BrandInput, AppError> {
    let Value::Object(fields) = patch else {
        return Err(AppError::Validation("Expected a JSON object".to_string()));
    };
    let mut base = serde_json::to_value(current).map_err(|e| AppError::Internal(e.into()))?;
    if let Value::Object(map) = &mut base {
        for (key, value) in fields {
            if map.contains_key(&key) {
                map.insert(key, value);
            }
        }
    }
    serde_json::from_value(base).map_err(|e| AppError::Validation(format!("Invalid brand: {e}")))
}
