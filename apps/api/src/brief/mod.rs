//! Brief collector: the user's input that seeds generation.
//!
//! Everything here runs before any network call: a brief that fails
//! validation never reaches the AI gateway.

pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::platform::Platform;

pub const MAX_IMAGES: usize = 10;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_GUIDELINE_BYTES: usize = 20 * 1024 * 1024;

/// MIME types accepted for brand guideline documents.
pub const GUIDELINE_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "text/markdown",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub title: String,
    pub direction: String,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub brand_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BriefError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Select at least one platform")]
    NoPlatforms,
    #[error("Creative direction is required")]
    MissingDirection,
    #[error("Maximum {} images allowed", MAX_IMAGES)]
    TooManyImages,
}

impl From<BriefError> for AppError {
    fn from(err: BriefError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl Brief {
    /// Checks the required fields and collapses repeated platforms, keeping
    /// the first occurrence of each.
    pub fn validated(mut self) -> Result<Self, BriefError> {
        if self.title.trim().is_empty() {
            return Err(BriefError::MissingTitle);
        }
        if self.direction.trim().is_empty() {
            return Err(BriefError::MissingDirection);
        }
        let mut seen = Vec::with_capacity(self.platforms.len());
        for platform in self.platforms {
            if !seen.contains(&platform) {
                seen.push(platform);
            }
        }
        if seen.is_empty() {
            return Err(BriefError::NoPlatforms);
        }
        self.platforms = seen;
        if self.image_urls.len() > MAX_IMAGES {
            return Err(BriefError::TooManyImages);
        }
        Ok(self)
    }

    /// The same brief narrowed to a single platform, for regeneration.
    pub fn for_platform(&self, platform: Platform) -> Brief {
        Brief {
            platforms: vec![platform],
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{0} is not an image")]
    NotAnImage(String),
    #[error("{0} is too large (max 5MB)")]
    ImageTooLarge(String),
    #[error("Maximum {} images allowed", MAX_IMAGES)]
    NoSlotsLeft,
    #[error("{0} is not a supported file type")]
    UnsupportedDocument(String),
    #[error("{0} is too large. Maximum size is 20MB")]
    DocumentTooLarge(String),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub fn validate_image(file_name: &str, content_type: &str, size: usize) -> Result<(), UploadError> {
    if !content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage(file_name.to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(UploadError::ImageTooLarge(file_name.to_string()));
    }
    Ok(())
}

pub fn validate_guideline_document(
    file_name: &str,
    content_type: &str,
    size: usize,
) -> Result<(), UploadError> {
    if !GUIDELINE_MIME_TYPES.contains(&content_type) {
        return Err(UploadError::UnsupportedDocument(file_name.to_string()));
    }
    if size > MAX_GUIDELINE_BYTES {
        return Err(UploadError::DocumentTooLarge(file_name.to_string()));
    }
    Ok(())
}

/// How many more images a brief with `attached` images can take.
pub fn remaining_image_slots(attached: usize) -> Result<usize, UploadError> {
    match MAX_IMAGES.checked_sub(attached) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(UploadError::NoSlotsLeft),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> Brief {
        Brief {
            title: "Launch Day".to_string(),
            direction: "Announce v2 release".to_string(),
            platforms: vec![Platform::Twitter, Platform::Linkedin],
            image_urls: vec![],
            brand_id: None,
        }
    }

    #[test]
    fn test_valid_brief_passes() {
        let validated = brief().validated().unwrap();
        assert_eq!(validated.platforms, vec![Platform::Twitter, Platform::Linkedin]);
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut b = brief();
        b.title = "   ".to_string();
        assert_eq!(b.validated().unwrap_err(), BriefError::MissingTitle);
    }

    #[test]
    fn test_blank_direction_rejected() {
        let mut b = brief();
        b.direction = String::new();
        assert_eq!(b.validated().unwrap_err(), BriefError::MissingDirection);
    }

    #[test]
    fn test_no_platform_rejected() {
        let mut b = brief();
        b.platforms.clear();
        assert_eq!(b.validated().unwrap_err(), BriefError::NoPlatforms);
    }

    #[test]
    fn test_duplicate_platforms_collapsed() {
        let mut b = brief();
        b.platforms = vec![Platform::Twitter, Platform::Twitter, Platform::Facebook];
        let validated = b.validated().unwrap();
        assert_eq!(validated.platforms, vec![Platform::Twitter, Platform::Facebook]);
    }

    #[test]
    fn test_eleven_images_rejected() {
        let mut b = brief();
        b.image_urls = (0..11).map(|i| format!("https://cdn/{i}.png")).collect();
        assert_eq!(b.validated().unwrap_err(), BriefError::TooManyImages);
    }

    #[test]
    fn test_brief_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "title": "Launch Day",
            "direction": "Announce v2 release",
            "platforms": ["twitter", "linkedin"],
            "imageUrls": ["https://cdn/1.png"],
        });
        let b: Brief = serde_json::from_value(json).unwrap();
        assert_eq!(b.image_urls.len(), 1);
        assert!(b.brand_id.is_none());
    }

    #[test]
    fn test_image_validation() {
        assert!(validate_image("a.png", "image/png", 1024).is_ok());
        assert_eq!(
            validate_image("a.pdf", "application/pdf", 1024),
            Err(UploadError::NotAnImage("a.pdf".to_string()))
        );
        assert_eq!(
            validate_image("big.jpg", "image/jpeg", MAX_IMAGE_BYTES + 1),
            Err(UploadError::ImageTooLarge("big.jpg".to_string()))
        );
    }

    #[test]
    fn test_guideline_validation() {
        assert!(validate_guideline_document("g.pdf", "application/pdf", MAX_GUIDELINE_BYTES).is_ok());
        assert!(validate_guideline_document("g.md", "text/markdown", 10).is_ok());
        assert!(matches!(
            validate_guideline_document("g.zip", "application/zip", 10),
            Err(UploadError::UnsupportedDocument(_))
        ));
        assert!(matches!(
            validate_guideline_document("g.pdf", "application/pdf", MAX_GUIDELINE_BYTES + 1),
            Err(UploadError::DocumentTooLarge(_))
        ));
    }

    #[test]
    fn test_remaining_slots() {
        assert_eq!(remaining_image_slots(0), Ok(10));
        assert_eq!(remaining_image_slots(9), Ok(1));
        assert_eq!(remaining_image_slots(10), Err(UploadError::NoSlotsLeft));
        assert_eq!(remaining_image_slots(12), Err(UploadError::NoSlotsLeft));
    }
}
