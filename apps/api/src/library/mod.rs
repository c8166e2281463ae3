//! Content library: saved posts, their lifecycle, and the dashboard and
//! calendar views over them.

pub mod handlers;
pub mod repository;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::craft::hashtags::dedup_hashtags;
use crate::errors::AppError;
use crate::finalize::to_utc;
use crate::models::platform::Platform;
use crate::models::post::{ContentPostRow, PostStatus, PostUpdate};

pub const DASHBOARD_LIST_LEN: i64 = 5;

/// Hashtags as typed in the edit dialog ("a, #b, c") or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HashtagInput {
    List(Vec<String>),
    Text(String),
}

impl HashtagInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            HashtagInput::List(tags) => dedup_hashtags(tags),
            HashtagInput::Text(text) => dedup_hashtags(text.split(',')),
        }
    }
}

/// PATCH body. Absent fields keep their stored value; `scheduledAt: null`
/// clears the schedule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub platforms: Option<Vec<Platform>>,
    pub status: Option<PostStatus>,
    pub hashtags: Option<HashtagInput>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Merges an edit into the stored post and checks the lifecycle rules.
pub fn apply_edit(
    current: &ContentPostRow,
    edit: PostEdit,
    now: DateTime<Utc>,
) -> Result<PostUpdate, AppError> {
    let from = current
        .status()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("post {}: {e}", current.id)))?;
    let mut to = edit.status.unwrap_or(from);
    if !from.can_transition_to(to) {
        return Err(AppError::UnprocessableEntity(format!(
            "A {from} post cannot be moved to {to}"
        )));
    }

    let title = edit
        .title
        .unwrap_or_else(|| current.title.clone())
        .trim()
        .to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let platforms = match edit.platforms {
        Some(list) => {
            let mut ids: Vec<String> = Vec::with_capacity(list.len());
            for p in list {
                if !ids.iter().any(|id| id == p.id()) {
                    ids.push(p.id().to_string());
                }
            }
            ids
        }
        None => current.platforms.clone(),
    };
    if platforms.is_empty() {
        return Err(AppError::Validation(
            "Select at least one platform".to_string(),
        ));
    }

    let mut scheduled_at = match edit.scheduled_at {
        Some(value) => value,
        None => current.scheduled_at,
    };
    if from == PostStatus::Scheduled && to == PostStatus::Draft {
        scheduled_at = None;
    } else if to == PostStatus::Draft && scheduled_at.is_some() {
        // Same rule as finalize: a dated draft is a scheduled post.
        to = PostStatus::Scheduled;
    }
    if to == PostStatus::Scheduled && scheduled_at.is_none() {
        return Err(AppError::Validation(
            "Scheduled posts need a date and time".to_string(),
        ));
    }

    let published_at = match to {
        PostStatus::Published => current.published_at.or(Some(now)),
        _ => None,
    };

    Ok(PostUpdate {
        title,
        content: edit.content.unwrap_or_else(|| current.content.clone()),
        platforms,
        status: to,
        hashtags: edit
            .hashtags
            .map(HashtagInput::into_tags)
            .unwrap_or_else(|| current.hashtags.clone()),
        scheduled_at,
        published_at,
    })
}

/// The UTC instants bounding a calendar day in the author's zone.
pub fn day_window(
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::Validation(format!("Date {date} is out of range")))?;
    let start = to_utc(date.and_time(NaiveTime::MIN), offset)?;
    let end = to_utc(next.and_time(NaiveTime::MIN), offset)?;
    Ok((start, end))
}
