//! Axum route handlers for the Guidelines API.

use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::brief::validate_guideline_document;
use crate::errors::AppError;
use crate::guidelines::ingest::{ensure_bucket_url, ingest_guideline, GuidelineSource};
use crate::models::guideline::BrandGuidelineRow;
use crate::state::AppState;
use crate::storage::file_extension;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body of the parse call. Every field is required; they are optional here
/// so a missing one becomes a 400 rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseGuidelineRequest {
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub brand_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ParseGuidelineResponse {
    pub success: bool,
    pub guideline: BrandGuidelineRow,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/guidelines/parse
///
/// Summarises an already-uploaded document and stores the result. The file
/// must live in the guidelines bucket; any other URL is a 400 and is never
/// fetched.
pub async fn handle_parse_guideline(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ParseGuidelineRequest>,
) -> Result<Json<ParseGuidelineResponse>, AppError> {
    let source = request.into_source()?;
    let config = &state.config;
    ensure_bucket_url(
        &source.file_url,
        &[config.s3_public_url.as_str(), config.s3_endpoint.as_str()],
        &config.s3_guidelines_bucket,
    )?;
    ensure_brand_owner(&state, user, source.brand_id).await?;

    let guideline = ingest_guideline(
        state.documents.as_ref(),
        state.summarizer.as_ref(),
        state.guidelines.as_ref(),
        source,
    )
    .await?;

    Ok(Json(ParseGuidelineResponse {
        success: true,
        guideline,
    }))
}

/// POST /api/v1/brands/:id/guidelines
///
/// Stores the uploaded `file` in the private bucket, then parses it through
/// a signed URL exactly as the parse endpoint would.
pub async fn handle_upload_guideline(
    State(state): State<AppState>,
    user: AuthUser,
    Path(brand_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ParseGuidelineResponse>), AppError> {
    ensure_brand_owner(&state, user, brand_id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("guidelines").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        upload = Some((file_name, content_type, data));
        break;
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    validate_guideline_document(&file_name, &content_type, data.len())?;

    let bucket = &state.config.s3_guidelines_bucket;
    let key = format!(
        "{}/{}/{}-{}",
        user.user_id,
        brand_id,
        chrono::Utc::now().timestamp_millis(),
        file_name
    );
    state.blobs.put(bucket, &key, data, &content_type).await?;

    let ttl = Duration::from_secs(state.config.signed_url_ttl_secs);
    let file_url = state.blobs.presign_get(bucket, &key, ttl).await?;
    info!("Stored guideline upload {key}");

    let guideline = ingest_guideline(
        state.documents.as_ref(),
        state.summarizer.as_ref(),
        state.guidelines.as_ref(),
        GuidelineSource {
            brand_id,
            file_type: file_extension(&file_name),
            file_name,
            file_url,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ParseGuidelineResponse {
            success: true,
            guideline,
        }),
    ))
}

/// GET /api/v1/brands/:id/guidelines
pub async fn handle_list_guidelines(
    State(state): State<AppState>,
    user: AuthUser,
    Path(brand_id): Path<Uuid>,
) -> Result<Json<Vec<BrandGuidelineRow>>, AppError> {
    if state.brands.get(user.user_id, brand_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Brand {brand_id} not found")));
    }
    Ok(Json(state.guidelines.list(user.user_id, brand_id).await?))
}

/// DELETE /api/v1/guidelines/:id
pub async fn handle_delete_guideline(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.guidelines.delete(user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Guideline {id} not found")))
    }
}

async fn ensure_brand_owner(state: &AppState, user: AuthUser, brand_id: Uuid) -> Result<(), AppError> {
    match state.brands.get(user.user_id, brand_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Forbidden(
            "Brand not found or unauthorized".to_string(),
        )),
    }
}

impl ParseGuidelineRequest {
    fn into_source(self) -> Result<GuidelineSource, AppError> {
        let missing = || AppError::Validation("Missing required fields".to_string());
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Ok(GuidelineSource {
            file_url: non_blank(self.file_url).ok_or_else(missing)?,
            file_name: non_blank(self.file_name).ok_or_else(missing)?,
            file_type: non_blank(self.file_type).ok_or_else(missing)?,
            brand_id: self.brand_id.ok_or_else(missing)?,
        })
    }
}
