//! In-memory fixtures for the ports in `AppState`, so handlers and the router
//! can be exercised without Postgres, S3 or the AI gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::account::repository::AccountRepository;
use crate::auth::issue_test_token;
use crate::brands::repository::BrandRepository;
use crate::brands::BrandContext;
use crate::brief::Brief;
use crate::config::Config;
use crate::errors::AppError;
use crate::generation::generator::{ContentGenerator, PlatformVariation};
use crate::guidelines::ingest::{
    DocumentSource, ExtractedDocument, FetchedDocument, GuidelineSummarizer,
};
use crate::guidelines::repository::GuidelineRepository;
use crate::library::repository::{ContentRepository, LibraryTotals};
use crate::llm_client::LlmError;
use crate::models::account::{ProfileRow, ProfileUpdate, SubscriptionRow};
use crate::models::brand::{BrandInput, BrandRow};
use crate::models::guideline::{BrandGuidelineRow, NewGuideline};
use crate::models::post::{ContentPostRow, NewPost, PostFilters, PostStatus, PostUpdate};
use crate::state::AppState;
use crate::storage::object_url;

// ────────────────────────────────────────────────────────────────────────────
// Repositories
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    brands: Vec<BrandRow>,
    guidelines: Vec<BrandGuidelineRow>,
    posts: Vec<ContentPostRow>,
    subscriptions: Vec<SubscriptionRow>,
    profiles: Vec<ProfileRow>,
}

/// One store backing every repository trait, so cross-table ownership checks
/// (guideline → brand) behave like the SQL joins.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn posts(&self) -> Vec<ContentPostRow> {
        self.tables.lock().unwrap().posts.clone()
    }

    pub fn guidelines(&self) -> Vec<BrandGuidelineRow> {
        self.tables.lock().unwrap().guidelines.clone()
    }

    fn owns_brand(tables: &Tables, user_id: Uuid, brand_id: Uuid) -> bool {
        tables
            .brands
            .iter()
            .any(|b| b.id == brand_id && b.user_id == user_id)
    }
}

fn brand_row(user_id: Uuid, id: Uuid, input: &BrandInput, created_at: DateTime<Utc>) -> BrandRow {
    BrandRow {
        id,
        user_id,
        name: input.name.clone(),
        website_url: input.website_url.clone(),
        instagram_handle: input.instagram_handle.clone(),
        twitter_handle: input.twitter_handle.clone(),
        linkedin_handle: input.linkedin_handle.clone(),
        facebook_handle: input.facebook_handle.clone(),
        logo_url: input.logo_url.clone(),
        primary_color: input.primary_color.clone(),
        secondary_color: input.secondary_color.clone(),
        voice_characteristics: input.voice_characteristics.clone(),
        brand_essence: Json(input.brand_essence.clone()),
        target_audience: Json(input.target_audience.clone()),
        content_themes: input.content_themes.clone(),
        created_at,
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl BrandRepository for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<BrandRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .brands
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<BrandRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .brands
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, input: &BrandInput) -> Result<BrandRow, AppError> {
        let row = brand_row(user_id, Uuid::new_v4(), input, Utc::now());
        self.tables.lock().unwrap().brands.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &BrandInput,
    ) -> Result<Option<BrandRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(slot) = tables
            .brands
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
        else {
            return Ok(None);
        };
        *slot = brand_row(user_id, id, input, slot.created_at);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.brands.len();
        tables.brands.retain(|b| !(b.id == id && b.user_id == user_id));
        let deleted = tables.brands.len() != before;
        if deleted {
            tables.guidelines.retain(|g| g.brand_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl GuidelineRepository for MemoryStore {
    async fn list(&self, user_id: Uuid, brand_id: Uuid) -> Result<Vec<BrandGuidelineRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        if !Self::owns_brand(&tables, user_id, brand_id) {
            return Ok(vec![]);
        }
        let mut rows: Vec<_> = tables
            .guidelines
            .iter()
            .filter(|g| g.brand_id == brand_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn parsed_contents(&self, brand_id: Uuid) -> Result<Vec<String>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .guidelines
            .iter()
            .filter(|g| g.brand_id == brand_id)
            .filter_map(|g| g.parsed_content.clone())
            .collect())
    }

    async fn insert(&self, guideline: NewGuideline) -> Result<BrandGuidelineRow, AppError> {
        let now = Utc::now();
        let row = BrandGuidelineRow {
            id: Uuid::new_v4(),
            brand_id: guideline.brand_id,
            file_name: guideline.file_name,
            file_type: guideline.file_type,
            file_url: guideline.file_url,
            parsed_content: guideline.parsed_content,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().guidelines.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(index) = tables.guidelines.iter().position(|g| g.id == id) else {
            return Ok(false);
        };
        if !Self::owns_brand(&tables, user_id, tables.guidelines[index].brand_id) {
            return Ok(false);
        }
        tables.guidelines.remove(index);
        Ok(true)
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn create(&self, post: NewPost) -> Result<ContentPostRow, AppError> {
        let now = Utc::now();
        let row = ContentPostRow {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            brand_id: post.brand_id,
            title: post.title,
            content: post.content,
            media_urls: post.media_urls,
            platforms: post.platforms,
            status: post.status.as_str().to_string(),
            hashtags: post.hashtags,
            scheduled_at: post.scheduled_at,
            published_at: post.published_at,
            ai_variations: Json(post.ai_variations),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().posts.push(row.clone());
        Ok(row)
    }

    async fn list(&self, user_id: Uuid, filters: &PostFilters) -> Result<Vec<ContentPostRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .posts
            .iter()
            .filter(|p| p.user_id == user_id && filters.matches(p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<ContentPostRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &PostUpdate,
    ) -> Result<Option<ContentPostRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
        else {
            return Ok(None);
        };
        row.title = update.title.clone();
        row.content = update.content.clone();
        row.platforms = update.platforms.clone();
        row.status = update.status.as_str().to_string();
        row.hashtags = update.hashtags.clone();
        row.scheduled_at = update.scheduled_at;
        row.published_at = update.published_at;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok(tables.posts.len() != before)
    }

    async fn totals(&self, user_id: Uuid) -> Result<LibraryTotals, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut totals = LibraryTotals::default();
        for post in tables.posts.iter().filter(|p| p.user_id == user_id) {
            totals.total += 1;
            match post.status() {
                Ok(PostStatus::Draft) => totals.drafts += 1,
                Ok(PostStatus::Scheduled) => totals.scheduled += 1,
                Ok(PostStatus::Published) => totals.published += 1,
                Err(_) => {}
            }
        }
        Ok(totals)
    }

    async fn scheduled(
        &self,
        user_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        limit: Option<i64>,
    ) -> Result<Vec<ContentPostRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| match (p.scheduled_at, window) {
                (Some(at), Some((from, to))) => at >= from && at < to,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.scheduled_at);
        if let Some(limit) = limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn subscription(&self, user_id: Uuid) -> Result<SubscriptionRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.subscriptions.iter().find(|s| s.user_id == user_id) {
            return Ok(row.clone());
        }
        let now = Utc::now();
        let row = SubscriptionRow {
            id: Uuid::new_v4(),
            user_id,
            plan_type: "trial".to_string(),
            trial_start_date: now,
            trial_end_date: now + chrono::Duration::days(14),
            subscription_status: "trial".to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.subscriptions.push(row.clone());
        Ok(row)
    }

    async fn profile(&self, user_id: Uuid) -> Result<ProfileRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.profiles.iter().find(|p| p.user_id == user_id) {
            return Ok(row.clone());
        }
        let now = Utc::now();
        let row = ProfileRow {
            id: Uuid::new_v4(),
            user_id,
            full_name: None,
            company_name: None,
            avatar_url: None,
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(row.clone());
        Ok(row)
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<ProfileRow, AppError> {
        let mut row = self.profile(user_id).await?;
        if let Some(v) = &update.full_name {
            row.full_name = Some(v.clone());
        }
        if let Some(v) = &update.company_name {
            row.company_name = Some(v.clone());
        }
        if let Some(v) = &update.avatar_url {
            row.avatar_url = Some(v.clone());
        }
        if let Some(v) = update.onboarding_completed {
            row.onboarding_completed = v;
        }
        let mut tables = self.tables.lock().unwrap();
        if let Some(slot) = tables.profiles.iter_mut().find(|p| p.user_id == user_id) {
            *slot = row.clone();
        }
        Ok(row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blob storage and document fetches
// ────────────────────────────────────────────────────────────────────────────

/// Objects keyed by their URL under `base`. Signed and public URLs both
/// resolve, so an upload → presign → fetch round trip works as it does
/// against S3. Every fetched URL is recorded.
pub struct MemoryBlobStore {
    base: String,
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    pub fetched: Mutex<Vec<String>>,
}

impl MemoryBlobStore {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            objects: Mutex::new(HashMap::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    fn url(&self, bucket: &str, key: &str) -> String {
        object_url(&self.base, bucket, key)
    }
}

#[async_trait]
impl crate::storage::BlobStore for MemoryBlobStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(self.url(bucket, key), (body, content_type.to_string()));
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, AppError> {
        Ok(format!("{}?expires={}", self.url(bucket, key), ttl.as_secs()))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.url(bucket, key)
    }
}

#[async_trait]
impl DocumentSource for MemoryBlobStore {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, AppError> {
        self.fetched.lock().unwrap().push(url.to_string());
        let key = url.split('?').next().unwrap_or(url);
        let objects = self.objects.lock().unwrap();
        let (body, content_type) = objects
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::Storage(format!("Failed to download file: {url}")))?;
        Ok(FetchedDocument { body, content_type })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI fixtures
// ────────────────────────────────────────────────────────────────────────────

/// Returns canned content per platform and records what it was asked.
#[derive(Default)]
pub struct FixtureGenerator {
    pub content: Mutex<HashMap<crate::models::platform::Platform, String>>,
    pub calls: Mutex<Vec<(Brief, Option<BrandContext>)>>,
    pub fail_with_status: Mutex<Option<u16>>,
}

#[async_trait]
impl ContentGenerator for FixtureGenerator {
    async fn generate(
        &self,
        brief: &Brief,
        brand: Option<&BrandContext>,
    ) -> Result<Vec<PlatformVariation>, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((brief.clone(), brand.cloned()));

        match *self.fail_with_status.lock().unwrap() {
            Some(429) => return Err(LlmError::RateLimited),
            Some(402) => return Err(LlmError::QuotaExhausted),
            Some(status) => {
                return Err(LlmError::Api {
                    status,
                    message: "fixture failure".to_string(),
                })
            }
            None => {}
        }

        let content = self.content.lock().unwrap();
        Ok(brief
            .platforms
            .iter()
            .map(|&p| {
                let body = content
                    .get(&p)
                    .cloned()
                    .unwrap_or_else(|| format!("{} for {p}", brief.title));
                PlatformVariation::new(p, body, vec!["launch".to_string()])
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FixtureSummarizer {
    pub seen: Mutex<Vec<ExtractedDocument>>,
}

#[async_trait]
impl GuidelineSummarizer for FixtureSummarizer {
    async fn summarize(
        &self,
        file_name: &str,
        _file_type: &str,
        document: &ExtractedDocument,
    ) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(document.clone());
        Ok(format!("Summary of {file_name}"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

pub struct Fixtures {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub generator: Arc<FixtureGenerator>,
    pub summarizer: Arc<FixtureSummarizer>,
}

impl Fixtures {
    pub fn new() -> Self {
        let config = Config::for_tests();
        let store = Arc::new(MemoryStore::default());
        let blobs = Arc::new(MemoryBlobStore::new(&config.s3_endpoint));
        let generator = Arc::new(FixtureGenerator::default());
        let summarizer = Arc::new(FixtureSummarizer::default());

        let state = AppState {
            config,
            generator: generator.clone(),
            summarizer: summarizer.clone(),
            brands: store.clone(),
            guidelines: store.clone(),
            posts: store.clone(),
            accounts: store.clone(),
            blobs: blobs.clone(),
            documents: blobs.clone(),
        };

        Self {
            state,
            store,
            blobs,
            generator,
            summarizer,
        }
    }

    /// `Authorization` header value for `user_id`.
    pub fn bearer(&self, user_id: Uuid) -> String {
        format!(
            "Bearer {}",
            issue_test_token(user_id, &self.state.config.jwt_secret)
        )
    }
}
