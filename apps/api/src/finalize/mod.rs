//! Finalize: turn a crafted variation set into a library record.

pub mod handlers;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::craft::hashtags::dedup_hashtags;
use crate::errors::AppError;
use crate::generation::generator::PlatformVariation;
use crate::models::post::{NewPost, PostStatus, StoredVariation};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizeError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Nothing to save: no variations")]
    NoVariations,
    #[error("A post can only be saved as draft or published")]
    UnsupportedStatus,
    #[error("Scheduled date {0} is in the past")]
    DateInPast(NaiveDate),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("{0} is out of range")]
    UnrepresentableTime(NaiveDateTime),
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),
}

impl From<FinalizeError> for AppError {
    fn from(err: FinalizeError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Largest offset in use anywhere (UTC+14, UTC-12 is inside it).
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub date: NaiveDate,
    /// Wall-clock "HH:MM" in the author's zone.
    pub time: String,
    /// Author's offset east of UTC in minutes (`-Date#getTimezoneOffset()`).
    /// Absent means UTC.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub title: String,
    #[serde(default)]
    pub brand_id: Option<Uuid>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub variations: Vec<PlatformVariation>,
    pub status: PostStatus,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

/// Joins a calendar day and an "HH:MM" wall-clock time. Days before `today`
/// are rejected; any time later today is accepted.
pub fn combine_schedule(
    date: NaiveDate,
    time: &str,
    today: NaiveDate,
) -> Result<NaiveDateTime, FinalizeError> {
    if date < today {
        return Err(FinalizeError::DateInPast(date));
    }
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| FinalizeError::InvalidTime(time.to_string()))?;
    Ok(date.and_time(time))
}

/// The author's zone. Dates and times in requests are read in it.
pub fn client_offset(minutes: Option<i32>) -> Result<FixedOffset, FinalizeError> {
    let minutes = minutes.unwrap_or(0);
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(FinalizeError::InvalidOffset(minutes));
    }
    FixedOffset::east_opt(minutes * 60).ok_or(FinalizeError::InvalidOffset(minutes))
}

/// The author's calendar day at `now`.
pub fn today_in(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Interprets a wall-clock timestamp in the author's zone.
pub fn to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Result<DateTime<Utc>, FinalizeError> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(FinalizeError::UnrepresentableTime(naive))
}

/// Validates a schedule against the author's current day and returns the
/// instant to store.
pub fn resolve_schedule(schedule: &Schedule, now: DateTime<Utc>) -> Result<DateTime<Utc>, FinalizeError> {
    let offset = client_offset(schedule.utc_offset_minutes)?;
    let naive = combine_schedule(schedule.date, &schedule.time, today_in(offset, now))?;
    to_utc(naive, offset)
}

/// Builds the insert payload. The first variation's body becomes the
/// canonical content; hashtags of all variations are merged.
pub fn build_post(
    user_id: Uuid,
    request: FinalizeRequest,
    scheduled_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<NewPost, FinalizeError> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(FinalizeError::MissingTitle);
    }
    let first = request.variations.first().ok_or(FinalizeError::NoVariations)?;

    let status = match (request.status, scheduled_at) {
        (PostStatus::Draft, Some(_)) => PostStatus::Scheduled,
        (PostStatus::Draft, None) => PostStatus::Draft,
        (PostStatus::Published, _) => PostStatus::Published,
        (PostStatus::Scheduled, _) => return Err(FinalizeError::UnsupportedStatus),
    };

    Ok(NewPost {
        user_id,
        brand_id: request.brand_id,
        title,
        content: first.content.clone(),
        media_urls: request.media_urls,
        platforms: request
            .variations
            .iter()
            .map(|v| v.platform.id().to_string())
            .collect(),
        status,
        hashtags: dedup_hashtags(request.variations.iter().flat_map(|v| v.hashtags.iter())),
        scheduled_at,
        published_at: (status == PostStatus::Published).then_some(now),
        ai_variations: request
            .variations
            .iter()
            .map(|v| StoredVariation {
                platform: v.platform.id().to_string(),
                content: v.content.clone(),
            })
            .collect(),
    })
}
