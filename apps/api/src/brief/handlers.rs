use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::brief::{remaining_image_slots, validate_image, UploadError};
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::file_extension;

#[derive(Debug, Deserialize)]
pub struct MediaUploadQuery {
    /// Images already attached to the brief.
    #[serde(default)]
    pub attached: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct MediaUploadResponse {
    pub urls: Vec<String>,
    pub rejected: Vec<RejectedFile>,
}

/// POST /api/v1/media
///
/// Uploads brief images to the public media bucket. Files beyond the brief's
/// remaining slots, or that fail validation or upload, are reported per file
/// and do not stop the others.
pub async fn handle_upload_media(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MediaUploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<MediaUploadResponse>, AppError> {
    let slots = remaining_image_slots(query.attached)?;
    let bucket = &state.config.s3_media_bucket;

    let mut urls = Vec::new();
    let mut rejected = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        if urls.len() >= slots {
            rejected.push(RejectedFile {
                file_name,
                reason: UploadError::NoSlotsLeft.to_string(),
            });
            continue;
        }

        if let Err(e) = validate_image(&file_name, &content_type, data.len()) {
            rejected.push(RejectedFile {
                file_name,
                reason: e.to_string(),
            });
            continue;
        }

        let key = format!(
            "{}/{}-{}.{}",
            user.user_id,
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            file_extension(&file_name)
        );

        match state.blobs.put(bucket, &key, data, &content_type).await {
            Ok(()) => urls.push(state.blobs.public_url(bucket, &key)),
            Err(e) => {
                warn!("Media upload of {file_name} failed: {e}");
                rejected.push(RejectedFile {
                    file_name: file_name.clone(),
                    reason: format!("Failed to upload {file_name}"),
                });
            }
        }
    }

    info!(
        "User {} uploaded {} image(s), {} rejected",
        user.user_id,
        urls.len(),
        rejected.len()
    );

    Ok(Json(MediaUploadResponse { urls, rejected }))
}
