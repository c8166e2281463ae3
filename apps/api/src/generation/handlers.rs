//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::brands::{load_brand_context, BrandContext};
use crate::brief::Brief;
use crate::errors::AppError;
use crate::generation::generator::PlatformVariation;
use crate::generation::session::VariationSet;
use crate::models::platform::Platform;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    pub brief: Brief,
    pub platform: Platform,
    pub variations: VariationSet,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub variations: Vec<PlatformVariation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// Validates the brief, then asks the model for one variation per platform.
pub async fn handle_generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(brief): Json<Brief>,
) -> Result<Json<GenerateResponse>, AppError> {
    let brief = brief.validated()?;
    let brand = brand_context_for(&state, user.user_id, brief.brand_id).await?;

    info!(
        "Generating '{}' for user {} on {} platform(s)",
        brief.title,
        user.user_id,
        brief.platforms.len()
    );
    let variations = state
        .generator
        .generate(&brief, brand.as_ref())
        .await
        .map_err(|e| AppError::from_llm("generation", e))?;

    Ok(Json(GenerateResponse { variations }))
}

/// POST /api/v1/generate/regenerate
///
/// Re-runs generation for a single platform and swaps it into the current
/// set. Every other variation, edits included, comes back untouched.
pub async fn handle_regenerate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<RegenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let brief = request.brief.validated()?;
    let mut variations = request.variations;

    if !variations.contains(request.platform) {
        return Err(AppError::Validation(format!(
            "No {} variation to regenerate",
            request.platform.spec().display_name
        )));
    }

    let brand = brand_context_for(&state, user.user_id, brief.brand_id).await?;
    let single = brief.for_platform(request.platform);

    let fresh = state
        .generator
        .generate(&single, brand.as_ref())
        .await
        .map_err(|e| AppError::from_llm("regeneration", e))?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Llm("regeneration returned no variation".to_string()))?;

    variations.replace_platform(fresh);
    info!("Regenerated {} for user {}", request.platform, user.user_id);

    Ok(Json(GenerateResponse {
        variations: variations.into_inner(),
    }))
}

async fn brand_context_for(
    state: &AppState,
    user_id: Uuid,
    brand_id: Option<Uuid>,
) -> Result<Option<BrandContext>, AppError> {
    match brand_id {
        Some(id) => {
            load_brand_context(state.brands.as_ref(), state.guidelines.as_ref(), user_id, id).await
        }
        None => Ok(None),
    }
}
